//! End-to-end tests for the CDR document splitter against a
//! BroadWorks-shaped export document.

use ck_core::{CdrRecord, CdrXmlSplitter, Error};

const BROADWORKS_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<broadWorksCDR version="19.0">
  <cdrData>
    <headerModule>
      <recordId>
        <eventCounter>0000004</eventCounter>
        <systemId>ChargekitAbsCpa</systemId>
      </recordId>
      <type>Start</type>
    </headerModule>
  </cdrData>
  <cdrData>
    <basicModule>
      <userNumber>1001</userNumber>
      <callingNumber>+4986517174963</callingNumber>
      <calledNumber>+4986517174964</calledNumber>
      <startTime>20160419210000.104</startTime>
    </basicModule>
  </cdrData>
  <cdrData>
    <basicModule>
      <userNumber>1002</userNumber>
      <callingNumber>+4986517174964</callingNumber>
      <calledNumber>+4986517174960</calledNumber>
      <startTime>20160419210005.247</startTime>
    </basicModule>
  </cdrData>
</broadWorksCDR>
"#;

fn splitter(doc: &str) -> CdrXmlSplitter {
    CdrXmlSplitter::open(doc.as_bytes()).unwrap()
}

#[test]
fn open_counts_every_record_up_front() {
    let splitter = splitter(BROADWORKS_DOC);
    assert_eq!(splitter.fragment_count(), 3);
    assert_eq!(splitter.processed_count(), 0);
}

#[test]
fn batches_carry_one_record_and_advance_the_counter() {
    let mut splitter = splitter(BROADWORKS_DOC);

    let first = splitter.next_batch().unwrap();
    assert_eq!(first.len(), 1);
    assert!(first[0].raw_xml.starts_with("<cdrData>"));
    assert!(first[0].raw_xml.ends_with("</cdrData>"));
    assert!(first[0].raw_xml.contains("<eventCounter>0000004</eventCounter>"));
    assert_eq!(splitter.processed_count(), 1);

    let second = splitter.next_batch().unwrap();
    assert!(second[0].raw_xml.contains("<userNumber>1001</userNumber>"));
    assert_eq!(splitter.processed_count(), 2);
}

#[test]
fn exhaustion_yields_none_and_freezes_the_counter() {
    let mut splitter = splitter(BROADWORKS_DOC);
    while splitter.next_batch().is_some() {}
    assert_eq!(splitter.processed_count(), 3);

    assert!(splitter.next_batch().is_none());
    assert!(splitter.next_batch().is_none());
    assert_eq!(splitter.processed_count(), 3);
}

#[test]
fn records_are_verbatim_slices_of_the_document() {
    let mut splitter = splitter(BROADWORKS_DOC);
    let mut last_offset = 0;
    while let Some(batch) = splitter.next_batch() {
        let fragment = &batch[0].raw_xml;
        let offset = BROADWORKS_DOC[last_offset..]
            .find(fragment.as_str())
            .expect("fragment must appear verbatim in the source document");
        last_offset += offset + fragment.len();
    }
}

#[test]
fn iterator_adapter_drains_in_document_order() {
    let batches: Vec<Vec<CdrRecord>> = splitter(BROADWORKS_DOC).collect();
    assert_eq!(batches.len(), 3);
    assert!(batches[0][0].raw_xml.contains("headerModule"));
    assert!(batches[1][0].raw_xml.contains("<userNumber>1001</userNumber>"));
    assert!(batches[2][0].raw_xml.contains("<userNumber>1002</userNumber>"));
}

#[test]
fn foreign_root_yields_no_records() {
    let doc = "<otherExport><cdrData><x>1</x></cdrData></otherExport>";
    let mut splitter = splitter(doc);
    assert_eq!(splitter.fragment_count(), 0);
    assert!(splitter.next_batch().is_none());
    assert_eq!(splitter.processed_count(), 0);
}

#[test]
fn mismatched_inner_end_tags_are_tolerated() {
    let doc = "<broadWorksCDR>\
               <cdrData><a>x</b></cdrData>\
               <cdrData><ok>1</ok></cdrData>\
               </broadWorksCDR>";
    let splitter = splitter(doc);
    assert_eq!(splitter.fragment_count(), 2);
}

#[test]
fn truncated_document_fails_at_open() {
    let cut = BROADWORKS_DOC
        .find("<userNumber>1002</userNumber>")
        .unwrap();
    let err = CdrXmlSplitter::open(BROADWORKS_DOC[..cut].as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Xml(_)));
}

#[test]
fn document_without_a_root_fails_at_open() {
    let err = CdrXmlSplitter::open("plain text, not markup".as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Xml(_)));
    let err = CdrXmlSplitter::open(&b""[..]).unwrap_err();
    assert!(matches!(err, Error::Xml(_)));
}

#[test]
fn records_survive_a_serde_round_trip() {
    let mut splitter = splitter(BROADWORKS_DOC);
    let record = splitter.next_batch().unwrap().remove(0);
    let json = serde_json::to_string(&record).unwrap();
    let back: CdrRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
