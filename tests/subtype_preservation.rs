//! Specification Subtype Preservation Tests
//!
//! Test Categories:
//! 1. Composition keeps the receiver's concrete type
//! 2. Builder retargeting
//! 3. Population failures

use specula::{
    AnySpecification, Discriminant, SpecId, SpecKind, SpecResult, Specification,
    SpecificationError, SpecificationErrorCode, SpecificationProvider, Subject,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Order {
    total: u32,
    paid: bool,
}

#[derive(Debug)]
enum OrderRule {
    Billable,
}

impl SpecId<Order> for OrderRule {
    fn value(&self) -> Discriminant {
        Discriminant::of(self)
    }
}

/// Rules the billing team owns
#[derive(Clone)]
struct BillingRule(Specification<Order>);

impl SpecKind for BillingRule {
    type Subject = Order;

    fn from_spec(spec: Specification<Order>) -> SpecResult<Self> {
        Ok(Self(spec))
    }

    fn as_spec(&self) -> &Specification<Order> {
        &self.0
    }
}

impl BillingRule {
    fn label(&self) -> String {
        format!("billing:{}", self.0)
    }
}

/// Only identified specifications are accepted as audit rules
#[derive(Clone)]
struct AuditRule(Specification<Order>);

impl SpecKind for AuditRule {
    type Subject = Order;

    fn from_spec(spec: Specification<Order>) -> SpecResult<Self> {
        if spec.id().is_none() {
            return Err(SpecificationError::construction(
                "Audit rules must be identified",
            ));
        }
        Ok(Self(spec))
    }

    fn as_spec(&self) -> &Specification<Order> {
        &self.0
    }
}

fn billing(provider: &SpecificationProvider) -> BillingRule {
    provider
        .builder::<Order>()
        .with_subject(Subject::of::<Order>())
        .with_predicate(|o: &Order| o.paid)
        .with_spec_type::<BillingRule>()
        .build()
        .unwrap()
}

// =============================================================================
// COMPOSITION KEEPS THE CONCRETE TYPE
// =============================================================================

/// Test: `and`, `or` and `not` on a specialized type return that type.
#[test]
fn test_algebra_returns_receiver_type() {
    let provider = SpecificationProvider::new();
    let paid = billing(&provider);
    let large = provider.of::<Order, _>(|o| o.total > 100);

    let both: BillingRule = paid.and(&large).unwrap();
    let either: BillingRule = paid.or(&large).unwrap();
    let neither: BillingRule = paid.not().unwrap();

    for rule in [&both, &either, &neither] {
        assert!(rule.as_spec().spec_type().is::<BillingRule>());
        assert!(rule.label().starts_with("billing:BillingRule"));
    }

    let order = Order { total: 500, paid: true };
    assert!(both.is_satisfied_by(&order).unwrap());
    assert!(either.is_satisfied_by(&order).unwrap());
    assert!(!neither.is_satisfied_by(&order).unwrap());
}

/// Test: A plain receiver with a specialized operand stays plain.
#[test]
fn test_plain_receiver_stays_plain() {
    let provider = SpecificationProvider::new();
    let large = provider.of::<Order, _>(|o| o.total > 100);
    let combined = large.and(&billing(&provider)).unwrap();

    assert!(combined.spec_type().is::<Specification<Order>>());
}

/// Test: `compose` and `negate` always return the base type.
#[test]
fn test_static_combinators_return_base() {
    let provider = SpecificationProvider::new();
    let paid = billing(&provider);
    let large = provider.of::<Order, _>(|o| o.total > 100);

    let operands: [&dyn AnySpecification; 2] = [&paid, &large];
    let all = Specification::<Order>::compose(&operands).unwrap();
    let negated = Specification::negate(&paid);

    assert!(all.spec_type().is::<Specification<Order>>());
    assert!(negated.spec_type().is::<Specification<Order>>());
}

// =============================================================================
// BUILDER RETARGETING
// =============================================================================

/// Test: A receiver's builder targets the receiver's type.
#[test]
fn test_receiver_builder_targets_receiver() {
    let provider = SpecificationProvider::new();
    let paid = billing(&provider);
    let builder = paid.builder();

    assert!(builder.spec_type().is::<BillingRule>());
    assert_eq!(builder.subject(), Some(Subject::of::<Order>()));
    assert!(!builder.has_predicate());
}

/// Test: `identified_as` materializes the requested type.
#[test]
fn test_identified_as_target_type() {
    let provider = SpecificationProvider::new();
    let large = provider.of::<Order, _>(|o| o.total > 100);

    let audit: AuditRule =
        Specification::<Order>::identified_as(&large, OrderRule::Billable).unwrap();
    assert!(audit.as_spec().spec_type().is::<AuditRule>());
    assert_eq!(audit.as_spec().to_string(), "AuditRule{subject=Order, id=OrderRule::Billable}");
}

// =============================================================================
// POPULATION FAILURES
// =============================================================================

/// Test: A type that refuses its state fails the build.
#[test]
fn test_population_refusal_fails_build() {
    let provider = SpecificationProvider::new();
    let result = provider
        .builder::<Order>()
        .with_subject(Subject::of::<Order>())
        .with_predicate(|o: &Order| o.paid)
        .with_spec_type::<AuditRule>()
        .build();

    let err = result.err().unwrap();
    assert_eq!(err.code(), SpecificationErrorCode::SpecConstructionFailed);
    assert_eq!(provider.metrics().builds_rejected, 1);
}

/// Test: A refused population does not take its id.
#[test]
fn test_population_refusal_leaves_id_free() {
    #[derive(Clone)]
    struct Never(Specification<Order>);

    impl SpecKind for Never {
        type Subject = Order;

        fn from_spec(_spec: Specification<Order>) -> SpecResult<Self> {
            Err(SpecificationError::construction("never"))
        }

        fn as_spec(&self) -> &Specification<Order> {
            &self.0
        }
    }

    let provider = SpecificationProvider::new();
    let large = provider.of::<Order, _>(|o| o.total > 100);

    let refused: SpecResult<Never> = Specification::<Order>::identified_as(&large, OrderRule::Billable);
    assert!(refused.is_err());
    assert!(provider.registry().is_empty());

    let accepted: SpecResult<AuditRule> =
        Specification::<Order>::identified_as(&large, OrderRule::Billable);
    assert!(accepted.is_ok());
}
