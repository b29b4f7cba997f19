#![no_main]

use std::collections::HashMap;

use ck_core::SubstitutionRule;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4_096 {
        return;
    }

    let input = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(_) => return,
    };

    let rule = match SubstitutionRule::compile(input) {
        Ok(rule) => rule,
        Err(_) => return,
    };

    let empty: HashMap<String, String> = HashMap::new();
    let _ = rule.evaluate(&empty);

    let mut ctx = HashMap::new();
    ctx.insert("userName".to_string(), "1001".to_string());
    ctx.insert("ReqType".to_string(), "*prepaid".to_string());
    let _ = rule.evaluate(&ctx);
});
