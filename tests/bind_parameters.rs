use aeroplan::catalog::{Catalog, DEFAULT_DB_NAME};
use aeroplan::error::DbError;
use aeroplan::expression::{BinaryOp, Expr};
use aeroplan::planner::{Planner, UpdatePlan};
use aeroplan::sql::ast::{UpdateClause, UpdateStatement};
use aeroplan::storage::row::{ColumnType, ColumnValue};
use std::thread;

fn setup_catalog() -> Catalog {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut catalog = Catalog::new();
    catalog
        .create_table(
            DEFAULT_DB_NAME,
            "t",
            vec![("a".into(), ColumnType::Integer), ("b".into(), ColumnType::Integer)],
        )
        .unwrap();
    catalog
}

/// UPDATE t SET a = $1 WHERE b = $2
fn prepared_plan(catalog: &Catalog) -> UpdatePlan {
    let stmt = UpdateStatement::new(
        "t",
        vec![UpdateClause::new("a", Expr::param(0))],
        Some(Expr::equals(Expr::column("b"), Expr::param(1))),
    );
    Planner::new(catalog).plan_update(&stmt).unwrap()
}

fn ints(values: &[i32]) -> Vec<ColumnValue> {
    values.iter().map(|v| ColumnValue::Integer(*v)).collect()
}

#[test]
fn bind_substitutes_assignment_and_predicate() {
    let catalog = setup_catalog();
    let mut plan = prepared_plan(&catalog);
    assert_eq!(plan.parameter_count(), 2);

    plan.bind_parameters(&ints(&[42, 7])).unwrap();

    assert_eq!(plan.project_info().target_list(), &vec![(0, Expr::constant(42))]);
    assert_eq!(plan.project_info().direct_map_list(), &vec![(1, (0, 1))]);
    let expected = Expr::equals(Expr::ColumnRef(1), Expr::constant(7));
    assert_eq!(plan.predicate(), Some(&expected));
    assert_eq!(plan.child().predicate(), Some(&expected));
    assert_eq!(plan.assignments()[0].value, Expr::constant(42));
}

#[test]
fn rebinding_leaves_no_trace_of_previous_values() {
    let catalog = setup_catalog();
    let mut plan = prepared_plan(&catalog);

    plan.bind_parameters(&ints(&[42, 7])).unwrap();
    plan.bind_parameters(&ints(&[100, 7])).unwrap();

    assert_eq!(plan.project_info().target_list(), &vec![(0, Expr::constant(100))]);
    assert_eq!(plan.assignments()[0].value, Expr::constant(100));
    assert!(!plan.explain().contains("42"));
    assert_eq!(plan.parameter_count(), 2);

    plan.bind_parameters(&ints(&[1, 2])).unwrap();
    assert_eq!(plan.predicate(), Some(&Expr::equals(Expr::ColumnRef(1), Expr::constant(2))));
}

#[test]
fn no_placeholders_remain_after_bind() {
    let catalog = setup_catalog();
    let stmt = UpdateStatement::new(
        "t",
        vec![
            UpdateClause::new("a", Expr::binary(BinaryOp::Multiply, Expr::param(2), Expr::column("b"))),
            UpdateClause::new("b", Expr::param(0)),
        ],
        Some(Expr::binary(
            BinaryOp::And,
            Expr::binary(BinaryOp::GreaterThan, Expr::column("a"), Expr::param(1)),
            Expr::binary(BinaryOp::LessThan, Expr::column("b"), Expr::param(3)),
        )),
    );
    let mut plan = Planner::new(&catalog).plan_update(&stmt).unwrap();
    assert_eq!(plan.parameter_count(), 4);

    plan.bind_parameters(&ints(&[1, 2, 3, 4])).unwrap();

    assert!(plan.assignments().iter().all(|u| !u.value.has_parameters()));
    assert!(plan.project_info().target_list().iter().all(|(_, e)| !e.has_parameters()));
    assert!(!plan.predicate().unwrap().has_parameters());
    assert!(!plan.child().predicate().unwrap().has_parameters());
    assert_eq!(
        plan.project_info().target_list()[0].1,
        Expr::binary(BinaryOp::Multiply, Expr::constant(3), Expr::ColumnRef(1))
    );
}

#[test]
fn too_few_values_leave_plan_untouched() {
    let catalog = setup_catalog();
    let mut plan = prepared_plan(&catalog);
    plan.bind_parameters(&ints(&[42, 7])).unwrap();
    let before = plan.project_info().clone();

    let err = plan.bind_parameters(&ints(&[5])).unwrap_err();
    assert_eq!(err, DbError::ParameterIndexOutOfRange { index: 1, supplied: 1 });
    assert_eq!(plan.project_info(), &before);
    assert_eq!(plan.assignments()[0].value, Expr::constant(42));
    assert_eq!(plan.predicate(), Some(&Expr::equals(Expr::ColumnRef(1), Expr::constant(7))));
}

#[test]
fn extra_values_are_ignored() {
    let catalog = setup_catalog();
    let mut plan = prepared_plan(&catalog);
    plan.bind_parameters(&ints(&[1, 2, 3])).unwrap();
    assert_eq!(plan.project_info().target_list(), &vec![(0, Expr::constant(1))]);
}

#[test]
fn binding_without_placeholders_is_noop() {
    let catalog = setup_catalog();
    let stmt = UpdateStatement::new("t", vec![UpdateClause::new("b", Expr::constant(3))], None);
    let mut plan = Planner::new(&catalog).plan_update(&stmt).unwrap();
    let before = plan.project_info().clone();
    plan.bind_parameters(&[]).unwrap();
    assert_eq!(plan.project_info(), &before);
    assert!(plan.predicate().is_none());
}

#[test]
fn cloned_plans_are_isolated() {
    let catalog = setup_catalog();
    let original = prepared_plan(&catalog);
    let mut sibling = original.clone();

    sibling.bind_parameters(&ints(&[9, 9])).unwrap();

    assert_eq!(original.project_info().target_list(), &vec![(0, Expr::param(0))]);
    assert_eq!(original.predicate(), Some(&Expr::equals(Expr::ColumnRef(1), Expr::param(1))));
    assert_eq!(sibling.project_info().target_list(), &vec![(0, Expr::constant(9))]);
}

#[test]
fn sessions_bind_their_own_copies_concurrently() {
    let catalog = setup_catalog();
    let template = prepared_plan(&catalog);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut plan = template.clone();
            thread::spawn(move || {
                plan.bind_parameters(&ints(&[i, i * 10])).unwrap();
                plan
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let plan = handle.join().unwrap();
        let i = i as i32;
        assert_eq!(plan.project_info().target_list(), &vec![(0, Expr::constant(i))]);
        assert_eq!(plan.predicate(), Some(&Expr::equals(Expr::ColumnRef(1), Expr::constant(i * 10))));
    }
    assert!(template.project_info().target_list()[0].1.has_parameters());
}

#[test]
fn duplicate_assignment_survives_rebinding() {
    let catalog = setup_catalog();
    let stmt = UpdateStatement::new(
        "t",
        vec![UpdateClause::new("a", Expr::param(0)), UpdateClause::new("a", Expr::param(1))],
        None,
    );
    let mut plan = Planner::new(&catalog).plan_update(&stmt).unwrap();
    plan.bind_parameters(&ints(&[1, 2])).unwrap();
    assert_eq!(plan.project_info().target_list(), &vec![(0, Expr::constant(2))]);
    assert_eq!(plan.project_info().direct_map_list(), &vec![(1, (0, 1))]);
    assert!(plan.project_info().covers(plan.table().schema()));
}
