#![no_main]

use libfuzzer_sys::fuzz_target;

use eventgate_core::event::RuntimeEvent;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(event) = RuntimeEvent::from_json(line) else {
        return;
    };

    // 직렬화 결과는 다시 같은 이벤트로 읽혀야 함
    let Ok(encoded) = serde_json::to_string(&event) else {
        return;
    };
    let decoded = RuntimeEvent::from_json(&encoded);
    assert_eq!(decoded.ok().as_ref(), Some(&event));
});
