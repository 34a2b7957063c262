//! Demonstration sources shipped with the CLI.

use std::collections::HashMap;

use propsweep_core::generators::{int_arb, int_list_arb};
use propsweep_core::{Catalog, ClassSource, ModuleSource, Property, PropertyDef};

/// Every source the CLI can resolve by name.
pub fn catalog() -> Catalog {
    Catalog::new()
        .with_class(sorting_tests())
        .with_module(arithmetic())
        .with_module(indexing())
}

fn sorted(values: &[i64]) -> Vec<i64> {
    let mut out = values.to_vec();
    out.sort_unstable();
    out
}

fn frequencies(values: &[i64]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }
    counts
}

/// Sorting a list keeps its length and elements and yields ascending order.
fn sorting_tests() -> ClassSource {
    ClassSource::new("sortingTests")
        .method("prop_equalLength", || {
            PropertyDef::new(
                vec![int_list_arb(10, -100, 100)],
                Property::unary(|v: &Vec<i64>| v.len() == sorted(v).len()),
            )
        })
        .method("prop_sortedResult", || {
            PropertyDef::new(
                vec![int_list_arb(10, -100, 100)],
                Property::unary(|v: &Vec<i64>| sorted(v).windows(2).all(|w| w[0] <= w[1])),
            )
        })
        .method("prop_containsSameElements", || {
            PropertyDef::new(
                vec![int_list_arb(10, -100, 100)],
                Property::unary(|v: &Vec<i64>| frequencies(v) == frequencies(&sorted(v))),
            )
        })
}

/// Integer arithmetic laws, one deliberately broken.
fn arithmetic() -> ModuleSource {
    ModuleSource::new("arithmetic")
        .function("prop_additionCommutes", || {
            PropertyDef::new(
                vec![int_arb(-10_000, 10_000), int_arb(-10_000, 10_000)],
                Property::binary(|a: &i64, b: &i64| a + b == b + a),
            )
        })
        .function("prop_additionAssociates", || {
            PropertyDef::new(
                vec![
                    int_arb(-10_000, 10_000),
                    int_arb(-10_000, 10_000),
                    int_arb(-10_000, 10_000),
                ],
                Property::ternary(|a: &i64, b: &i64, c: &i64| (a + b) + c == a + (b + c)),
            )
        })
        .function("prop_broken", || {
            PropertyDef::new(vec![int_arb(-1000, 1000)], Property::unary(|_: &i64| false))
        })
        // not a candidate under the default pattern
        .function("double", || {
            PropertyDef::new(vec![int_arb(0, 10)], Property::unary(|x: &i64| x * 2 >= 0))
        })
}

/// Slice indexing; reading one past the end always panics.
fn indexing() -> ModuleSource {
    ModuleSource::new("indexing")
        .function("prop_lastIsInBounds", || {
            PropertyDef::new(
                vec![int_list_arb(5, -100, 100)],
                Property::unary(|v: &Vec<i64>| v.get(v.len() - 1) == v.last()),
            )
        })
        .function("prop_pastTheEnd", || {
            PropertyDef::new(
                vec![int_list_arb(5, -100, 100)],
                Property::unary(|v: &Vec<i64>| v[v.len()] == v[0]),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use propsweep_core::PropertySource;
    use propsweep_core::pattern::NamePattern;

    #[test]
    fn catalog_lists_every_source() {
        let catalog = catalog();
        assert_eq!(catalog.class_names().collect::<Vec<_>>(), vec!["sortingTests"]);
        assert_eq!(
            catalog.module_names().collect::<Vec<_>>(),
            vec!["arithmetic", "indexing"]
        );
    }

    #[test]
    fn helper_is_not_a_candidate() {
        let bindings = arithmetic().list_bindings(&NamePattern::default());
        let names: Vec<_> = bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["prop_additionAssociates", "prop_additionCommutes", "prop_broken"]
        );
        assert!(bindings.iter().all(|b| b.is_well_formed()));
    }

    #[test]
    fn frequencies_ignore_order() {
        assert_eq!(frequencies(&[3, 1, 3]), frequencies(&[1, 3, 3]));
        assert_ne!(frequencies(&[3, 1]), frequencies(&[1, 1]));
    }
}
