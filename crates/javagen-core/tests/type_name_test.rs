//! Parsing properties of type references and dialect selection

use std::path::Path;

use javagen_core::{CoreError, Dialect, Generics, TypeName};
use proptest::prelude::*;

fn dotted() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,4}", 0..4)
        .prop_flat_map(|package| ("[A-Z][A-Za-z0-9]{0,5}", Just(package)))
        .prop_map(|(class, mut package)| {
            package.push(class);
            package.join(".")
        })
}

fn generic() -> impl Strategy<Value = String> {
    dotted().prop_recursive(3, 12, 3, |inner| {
        (dotted(), prop::collection::vec(inner, 1..3))
            .prop_map(|(outer, args)| format!("{}<{}>", outer, args.join(", ")))
    })
}

proptest! {
    #[test]
    fn canonical_references_print_back_unchanged(text in generic()) {
        let parsed = TypeName::parse(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn simple_name_is_the_last_path_segment(text in dotted()) {
        let parsed = TypeName::parse(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed.simple_name(), text.rsplit('.').next().unwrap_or_default());
        prop_assert!(parsed.generics().is_none());
    }
}

#[test]
fn test_wildcards_stay_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = TypeName::parse("java.util.List<? extends com.acme.Row>")?;
    assert_eq!(
        parsed.generics(),
        &Generics::Verbatim("<? extends com.acme.Row>".to_string())
    );
    assert_eq!(parsed.to_string(), "java.util.List<? extends com.acme.Row>");
    Ok(())
}

#[test]
fn test_rejects_non_references() {
    for text in ["", "com..Table", "com.acme.", "1com.Table", "a b", "com.acme.Table extends"] {
        assert!(
            matches!(TypeName::parse(text), Err(CoreError::InvalidTypeName(_))),
            "{:?} should not parse",
            text
        );
    }
}

#[test]
fn test_dialect_for_path() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(
        Dialect::for_path(Path::new("out/com/acme/Table.java"))?,
        (Dialect::Java, "Table".to_string())
    );
    assert_eq!(
        Dialect::for_path(Path::new("Table.scala"))?,
        (Dialect::Scala, "Table".to_string())
    );
    assert_eq!(
        Dialect::for_path(Path::new("a.b/Table.kt"))?,
        (Dialect::Kotlin, "Table".to_string())
    );
    assert_eq!(
        Dialect::for_path(Path::new("Table.kts")),
        Err(CoreError::UnknownExtension("kts".to_string()))
    );
    assert_eq!(
        Dialect::for_path(Path::new("Makefile")),
        Err(CoreError::UnknownExtension("Makefile".to_string()))
    );
    Ok(())
}
