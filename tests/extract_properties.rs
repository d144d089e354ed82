//! Property tests for SQL extraction.

use nl_query::extract;
use proptest::prelude::*;

/// Statement-ish text with no fences and no terminators
fn statement() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_*=,.'\"() \n\t]{1,60}".prop_filter("needs a visible character", |s| {
        !s.trim().is_empty()
    })
}

proptest! {
    #[test]
    fn extraction_is_idempotent(text in any::<String>()) {
        if let Ok(sql) = extract(&text) {
            let again = extract(sql.as_str()).unwrap();
            prop_assert_eq!(again, sql);
        }
    }

    #[test]
    fn extracted_statement_is_trimmed_and_unterminated(text in any::<String>()) {
        if let Ok(sql) = extract(&text) {
            let s = sql.as_str();
            prop_assert!(!s.is_empty());
            prop_assert_eq!(s, s.trim());
            prop_assert!(!s.ends_with(';'));
        }
    }

    #[test]
    fn fenced_interior_wins_over_surrounding_prose(
        before in "[A-Za-z ,.:]{0,30}",
        body in statement(),
        after in "[A-Za-z ,.:]{0,30}",
        tag in prop_oneof![Just(""), Just("sql"), Just("SQL")],
    ) {
        let completion = format!("{before}\n```{tag}\n{body};\n```\n{after}");
        let sql = extract(&completion).unwrap();
        prop_assert_eq!(sql.as_str(), body.trim());
    }

    #[test]
    fn bare_statement_loses_one_terminator(body in statement()) {
        let sql = extract(&format!("  {body} ;  ")).unwrap();
        prop_assert_eq!(sql.as_str(), body.trim());
    }
}
