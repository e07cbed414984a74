mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{datetime, Fixture};
use tally_core::{CoreError, LedgerStore};
use tally_domain::{Loan, LoanStatus, TransactionKind};

fn thousand_loan() -> Loan {
    Loan::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        dec!(1000.00),
        dec!(5.0),
        datetime(2024, 1, 1, 0, 0),
        datetime(2024, 6, 1, 0, 0),
    )
}

#[test]
fn create_resets_remaining_to_principal() {
    let fx = Fixture::new();
    let mut loan = thousand_loan();
    loan.remaining_amount = dec!(1.00);

    let created = fx.loans.create(loan).expect("create");
    assert_eq!(created.status, LoanStatus::Pending);
    assert_eq!(created.remaining_amount, dec!(1000.00));
}

#[test]
fn approve_activates_and_disburses_to_borrower() {
    let fx = Fixture::new();
    let created = fx.loans.create(thousand_loan()).expect("create");

    let approved = fx.loans.approve(created.id).expect("approve");
    assert_eq!(approved.status, LoanStatus::Active);

    let disbursements = fx
        .store
        .transactions_where(&|t| t.loan_id == Some(created.id))
        .expect("query");
    assert_eq!(disbursements.len(), 1);
    assert_eq!(disbursements[0].kind, TransactionKind::Loan);
    assert_eq!(disbursements[0].amount, dec!(1000.00));
    assert_eq!(disbursements[0].user_id, created.borrower_id);
}

#[test]
fn approve_requires_pending() {
    let fx = Fixture::new();
    let created = fx.loans.create(thousand_loan()).expect("create");
    fx.loans.approve(created.id).expect("approve");

    let err = fx.loans.approve(created.id).unwrap_err();
    assert!(matches!(err, CoreError::InvalidLoanState(_)));
}

#[test]
fn payments_reduce_remaining_and_overpayment_completes_clamped() {
    let fx = Fixture::new();
    let created = fx.loans.create(thousand_loan()).expect("create");
    fx.loans.approve(created.id).expect("approve");

    let after_first = fx
        .loans
        .record_payment(created.id, dec!(600.00))
        .expect("first payment");
    assert_eq!(after_first.status, LoanStatus::Active);
    assert_eq!(after_first.remaining_amount, dec!(400.00));

    let after_second = fx
        .loans
        .record_payment(created.id, dec!(500.00))
        .expect("second payment");
    assert_eq!(after_second.status, LoanStatus::Completed);
    // Overpayment clamps to zero rather than leaking a negative remainder.
    assert_eq!(after_second.remaining_amount, Decimal::ZERO);
    assert_eq!(after_second.payment_ids.len(), 2);

    // A completed loan accepts no further payments.
    let err = fx.loans.record_payment(created.id, dec!(1.00)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidLoanState(_)));
}

#[test]
fn payment_transactions_belong_to_the_borrower() {
    let fx = Fixture::new();
    let created = fx.loans.create(thousand_loan()).expect("create");
    fx.loans.approve(created.id).expect("approve");
    fx.loans
        .record_payment(created.id, dec!(250.00))
        .expect("payment");

    let payments = fx
        .store
        .transactions_where(&|t| {
            t.loan_id == Some(created.id) && t.kind == TransactionKind::LoanPayment
        })
        .expect("query");
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].user_id, created.borrower_id);
    assert_eq!(payments[0].amount, dec!(250.00));
}

#[test]
fn aging_defaults_only_active_loans_past_due() {
    let fx = Fixture::new();
    let active = fx.loans.create(thousand_loan()).expect("create");
    fx.loans.approve(active.id).expect("approve");
    let pending = fx.loans.create(thousand_loan()).expect("create pending");

    let past_due = datetime(2024, 6, 2, 0, 0);
    let report = fx.loans.age_loans(past_due).expect("sweep");
    assert_eq!(report.transitioned, 1);

    assert_eq!(
        fx.store.loan(active.id).expect("load").status,
        LoanStatus::Defaulted
    );
    assert_eq!(
        fx.store.loan(pending.id).expect("load").status,
        LoanStatus::Pending
    );

    // Re-running changes nothing.
    assert_eq!(fx.loans.age_loans(past_due).expect("rerun").transitioned, 0);
}

#[test]
fn cancel_is_allowed_from_pending_and_active_only() {
    let fx = Fixture::new();
    let loan = fx.loans.create(thousand_loan()).expect("create");
    let cancelled = fx.loans.cancel(loan.id).expect("cancel");
    assert_eq!(cancelled.status, LoanStatus::Cancelled);

    let err = fx.loans.cancel(loan.id).unwrap_err();
    assert!(matches!(err, CoreError::InvalidLoanState(_)));
}

#[test]
fn borrower_and_lender_must_differ() {
    let fx = Fixture::new();
    let user = Uuid::new_v4();
    let loan = Loan::new(
        user,
        user,
        dec!(100.00),
        dec!(0.0),
        datetime(2024, 1, 1, 0, 0),
        datetime(2024, 2, 1, 0, 0),
    );

    let err = fx.loans.create(loan).unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));
}
