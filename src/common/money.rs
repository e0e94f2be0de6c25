// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Arredonda para 2 casas, metade para longe do zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Valores derivados de um negócio. Sempre recalculados, nunca aceitos do cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealAmounts {
    pub discount_amount: Decimal,
    pub sales_commission_amount: Decimal,
}

impl DealAmounts {
    pub fn compute(
        value: Decimal,
        discount_percentage: Decimal,
        sales_commission_percentage: Decimal,
    ) -> Self {
        let discount_amount = round_money(value * discount_percentage / HUNDRED);
        let sales_commission_amount =
            round_money((value - discount_amount) * sales_commission_percentage / HUNDRED);

        Self { discount_amount, sales_commission_amount }
    }
}
