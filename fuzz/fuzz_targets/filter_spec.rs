#![no_main]

use libfuzzer_sys::fuzz_target;
use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;
use eventgate_filter::{build_filter_list, default_filters, parse_filter_list};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // 권한 없이 파싱에 성공한 목록은 권한이 있어도 같아야 함
    let unprivileged = parse_filter_list(text, false);
    let privileged = parse_filter_list(text, true);
    if let (Ok(a), Ok(b)) = (&unprivileged, &privileged) {
        assert_eq!(a, b);
    }

    let Ok(specs) = privileged else {
        return;
    };

    // 잘못된 정규식은 에러여야 하고 크래시는 안 됨
    let Ok(list) = build_filter_list(&CancellationToken::new(), &specs, &default_filters()) else {
        return;
    };
    assert_eq!(list.len(), specs.len());

    let _ = list.match_one(&RuntimeEvent::default());
});
