#![no_main]
use libfuzzer_sys::fuzz_target;

use booking_engine::domain::unit_query::UnitQuery;

// Input is split on '&' into max_price, check_in and check_out; an empty field is absent.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let mut fields = text.splitn(3, '&').map(|f| (!f.is_empty()).then_some(f));
        let max_price = fields.next().flatten();
        let check_in = fields.next().flatten();
        let check_out = fields.next().flatten();
        if let Ok(query) = UnitQuery::parse(max_price, check_in, check_out) {
            let _ = query.validate();
        }
    }
});
