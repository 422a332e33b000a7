use serde::Serialize;

use super::percentage;
use crate::{PaymentMethod, ResultEngine, Transaction, util::add_minor};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MethodShare {
    pub amount_minor: i64,
    pub percentage: f64,
    pub transaction_count: usize,
}

/// Month spend split by payment method.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CreditDebitSplit {
    pub credit: MethodShare,
    pub debit: MethodShare,
}

pub fn split_by_method<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> ResultEngine<CreditDebitSplit> {
    let mut split = CreditDebitSplit::default();
    for tx in transactions {
        let share = match tx.method {
            PaymentMethod::Credit => &mut split.credit,
            PaymentMethod::Debit => &mut split.debit,
        };
        share.amount_minor = add_minor(share.amount_minor, tx.spent_minor())?;
        share.transaction_count += 1;
    }

    let total = add_minor(split.credit.amount_minor, split.debit.amount_minor)?;
    split.credit.percentage = percentage(split.credit.amount_minor, total);
    split.debit.percentage = percentage(split.debit.amount_minor, total);
    Ok(split)
}
