//! Property tests for pipeline composition, check ordering, annotation
//! normalization and default substitution.

use proptest::prelude::*;

use hintexec_check::{
    checks, enforce, normalize_annotations, sequence, Annotation, Assert, CallArgs, Hook, Modify,
    Param, Predicate, Signature, SpecItem, TypeHint, Value,
};

fn add(k: i64) -> Hook {
    Hook::map(format!("+ {k}"), move |v| Value::Int(v.as_int().unwrap_or(0) + k))
}

/// Annotation shapes: plain hint, spec with hint, spec without hint,
/// sequence with hint, or none at all.
fn annotation(shape: u8) -> Option<Annotation> {
    let positive = || Predicate::new("positive", |v| v > &Value::Int(0));
    match shape {
        0 => Some(TypeHint::int().into()),
        1 => Some(checks![TypeHint::float(), positive()].into()),
        2 => Some(checks![positive()].into()),
        3 => Some(sequence![TypeHint::str(), checks![positive()]].into()),
        _ => None,
    }
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec(inner, 0..4).prop_map(Value::Tuple),
        ]
    })
}

fn arb_hint() -> impl Strategy<Value = TypeHint> {
    prop_oneof![
        Just(TypeHint::none()),
        Just(TypeHint::bool()),
        Just(TypeHint::int()),
        Just(TypeHint::float()),
        Just(TypeHint::str()),
        Just(TypeHint::named("Path")),
        Just(TypeHint::optional(TypeHint::int())),
        Just(TypeHint::generic("Mapping", [TypeHint::str(), TypeHint::float()])),
    ]
}

fn rendered(annotations: &hintexec_check::Annotations) -> Vec<(String, Option<String>)> {
    annotations
        .iter()
        .map(|(name, a)| (name.clone(), a.typehint().map(ToString::to_string)))
        .collect()
}

proptest! {
    #[test]
    fn hooks_compose_in_declaration_order(x in -1000i64..1000, ks in prop::collection::vec(-50i64..50, 0..8)) {
        let spec = Modify::new(ks.iter().map(|&k| SpecItem::from(add(k))));
        let f = enforce(
            Signature::new("f").param(Param::new("a").annotate(spec)),
            |args| Ok(args.arg("a")?.clone()),
        )
        .unwrap();

        let expected = x + ks.iter().sum::<i64>();
        prop_assert_eq!(f.call(CallArgs::positional([x])).unwrap(), Value::Int(expected));
    }

    #[test]
    fn hint_only_assert_passes_any_value_through(value in arb_value(), hint in arb_hint()) {
        let f = enforce(
            Signature::new("f").param(Param::new("a").annotate(checks![hint])),
            |args| Ok(args.arg("a")?.clone()),
        )
        .unwrap();

        prop_assert_eq!(f.call(CallArgs::positional([value.clone()])).unwrap(), value.clone());
        prop_assert_eq!(f.call(CallArgs::new().kwarg("a", value.clone())).unwrap(), value);
    }

    #[test]
    fn first_failing_predicate_wins(v in -20i64..20, thresholds in prop::collection::vec(-20i64..20, 2..6)) {
        let items = thresholds.iter().enumerate().map(|(i, &t)| {
            SpecItem::from(Predicate::new(format!("p{i}"), move |x| x < &Value::Int(t)))
        });
        let f = enforce(
            Signature::new("f").param(Param::new("a").annotate(Assert::new(items))),
            |args| Ok(args.arg("a")?.clone()),
        )
        .unwrap();

        let result = f.call(CallArgs::positional([v]));
        match thresholds.iter().position(|&t| v >= t) {
            Some(i) => {
                let violation = result.unwrap_err().violation().unwrap();
                prop_assert_eq!(violation.predicate, format!("p{i}"));
                prop_assert_eq!(violation.value, Value::Int(v));
            }
            None => prop_assert_eq!(result.unwrap(), Value::Int(v)),
        }
    }

    #[test]
    fn normalization_is_idempotent(shapes in prop::collection::vec(0u8..5, 0..8), ret in 0u8..5) {
        let mut sig = Signature::new("f");
        for (i, &shape) in shapes.iter().enumerate() {
            let mut param = Param::new(format!("p{i}"));
            param.annotation = annotation(shape);
            sig = sig.param(param);
        }
        sig.returns = annotation(ret);

        let once = normalize_annotations(&sig.annotations());
        let twice = normalize_annotations(&once);
        prop_assert_eq!(rendered(&once), rendered(&twice));
        prop_assert!(once.values().all(|a| matches!(a, Annotation::Hint(_))));

        // Only hintless specs disappear.
        let kept = shapes.iter().filter(|&&s| s != 2 && s != 4).count()
            + usize::from(ret != 2 && ret != 4);
        prop_assert_eq!(once.len(), kept);
    }

    #[test]
    fn omitted_argument_behaves_like_its_default(a in -10i64..10, d in -10i64..10) {
        let f = enforce(
            Signature::new("f").param(Param::new("a")).param(
                Param::new("b")
                    .annotate(checks![Predicate::with_siblings("b > a", ["a"], |b, sib| Ok(b > &sib[0]))])
                    .default(d),
            ),
            |args| Ok(Value::Tuple(args.iter().map(|(_, v)| v.clone()).collect())),
        )
        .unwrap();

        let omitted = f.call(CallArgs::positional([a]));
        let explicit = f.call(CallArgs::positional([a, d]));
        match (omitted, explicit) {
            (Ok(lhs), Ok(rhs)) => prop_assert_eq!(lhs, rhs),
            (Err(lhs), Err(rhs)) => prop_assert_eq!(lhs.violation(), rhs.violation()),
            (lhs, rhs) => prop_assert!(false, "diverged: {:?} vs {:?}", lhs, rhs),
        }
    }
}
