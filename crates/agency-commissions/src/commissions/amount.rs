use super::itinerary::{FareComponent, FarePath};
use super::ordering::MatchedRule;
use super::reference::{CurrencyConverter, CurrencyError, RoundingMode};

/// Converts rule values into commission amounts in the payment currency.
pub struct AmountCalculator<'a> {
    converter: &'a dyn CurrencyConverter,
    calculation_currency: &'a str,
    base_fare_currency: &'a str,
    payment_currency: &'a str,
    non_iata_rounding: bool,
}

impl<'a> AmountCalculator<'a> {
    pub fn new(
        converter: &'a dyn CurrencyConverter,
        fare_path: &'a FarePath,
        payment_currency: &'a str,
    ) -> Self {
        Self {
            converter,
            calculation_currency: &fare_path.calculation_currency,
            base_fare_currency: &fare_path.base_fare_currency,
            payment_currency,
            non_iata_rounding: fare_path.non_iata_rounding,
        }
    }

    /// Fare total the percentage applies to, expressed in the payment currency.
    pub fn net_amount(
        &self,
        component: &FareComponent,
        surcharge_applicable: bool,
    ) -> Result<f64, CurrencyError> {
        let surcharge = if surcharge_applicable {
            0.0
        } else {
            component.surcharge_amount
        };
        let mut amount = component.total_fare_amount - surcharge;

        if self.calculation_currency != self.base_fare_currency {
            let rounding = if self.non_iata_rounding {
                RoundingMode::NonIata
            } else {
                RoundingMode::Standard
            };
            amount = self.converter.convert(
                amount,
                self.calculation_currency,
                self.base_fare_currency,
                rounding,
            )?;
        }

        if self.base_fare_currency != self.payment_currency {
            amount = self.converter.convert(
                amount,
                self.base_fare_currency,
                self.payment_currency,
                RoundingMode::Standard,
            )?;
        }

        Ok(amount)
    }

    pub fn percent_of(
        &self,
        component: &FareComponent,
        percent: f64,
        surcharge_applicable: bool,
    ) -> Result<f64, CurrencyError> {
        Ok(self.net_amount(component, surcharge_applicable)? * percent / 100.0)
    }

    /// Amount a rule earns on a component: a percentage of the net amount, or the converted
    /// flat amount for segment bonus rules.
    pub fn commission(
        &self,
        component: &FareComponent,
        matched: &MatchedRule,
    ) -> Result<f64, CurrencyError> {
        if matched.rule.commission_type.is_flat_amount() {
            let currency = matched
                .rule
                .currency
                .as_deref()
                .unwrap_or(self.payment_currency);
            return self.converter.convert(
                matched.rule.value,
                currency,
                self.payment_currency,
                RoundingMode::Standard,
            );
        }

        self.percent_of(component, matched.rule.value, matched.surcharge_applicable)
    }
}
