// =================================================================
// sim/generator.rs - Synthetic Position Generator
// =================================================================

use chrono::Utc;
use rand::Rng;

use super::types::{round_dp, InstrumentClass, Position, PositionSide};

/// Generates synthetic position records for a single instrument.
///
/// Pure apart from its random source: every call produces a fresh,
/// independent record with prices drawn from the instrument class ranges.
pub struct PositionGenerator {
    symbol: String,
    class: InstrumentClass,
}

impl PositionGenerator {
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let class = InstrumentClass::classify(&symbol);
        Self { symbol, class }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn class(&self) -> InstrumentClass {
        self.class
    }

    /// Generate one position record for the given side.
    pub fn generate(&self, side: PositionSide) -> Position {
        let mut rng = rand::thread_rng();

        // Not globally unique; collisions are tolerated downstream
        let ticket = Utc::now().timestamp_millis() % 100_000 + rng.gen_range(1..1000);

        let volume = round_dp(rng.gen_range(0.01..0.05), 2);

        let decimals = self.class.price_decimals();
        let (open_lo, open_hi) = self.class.open_price_range();
        let (offset_lo, offset_hi) = self.class.offset_range();

        let price_open = round_dp(rng.gen_range(open_lo..open_hi), decimals);
        let offset = rng.gen_range(offset_lo..offset_hi);
        let price_current = round_dp(price_open + offset, decimals);

        let profit = round_dp(
            side.sign_factor() * (price_current - price_open) * volume * self.class.profit_multiplier(),
            2,
        );

        Position {
            symbol: self.symbol.clone(),
            ticket,
            side,
            volume,
            price_open,
            price_current,
            profit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_precision(value: f64, decimals: u32) {
        assert!(
            (value - round_dp(value, decimals)).abs() < EPS,
            "{} exceeds {} decimal places",
            value,
            decimals
        );
    }

    #[test]
    fn test_fx_price_ranges_and_precision() {
        let generator = PositionGenerator::new("EURUSD");
        assert_eq!(generator.class(), InstrumentClass::Fx);

        for _ in 0..500 {
            let position = generator.generate(PositionSide::Buy);
            assert!(position.price_open >= 1.10 && position.price_open <= 1.20);
            assert!(position.price_current >= 1.10 - 0.005 - EPS);
            assert!(position.price_current <= 1.20 + 0.005 + EPS);
            assert_precision(position.price_open, 5);
            assert_precision(position.price_current, 5);
        }
    }

    #[test]
    fn test_metal_price_ranges_and_precision() {
        let generator = PositionGenerator::new("XAUUSD");
        assert_eq!(generator.class(), InstrumentClass::Metal);

        for _ in 0..500 {
            let position = generator.generate(PositionSide::Sell);
            assert!(position.price_open >= 1900.0 && position.price_open <= 2000.0);
            assert_precision(position.price_open, 1);
            assert_precision(position.price_current, 1);
        }
    }

    #[test]
    fn test_volume_range_and_precision() {
        for symbol in ["EURUSD", "XAUUSD"] {
            let generator = PositionGenerator::new(symbol);
            for side in [PositionSide::Buy, PositionSide::Sell] {
                for _ in 0..500 {
                    let position = generator.generate(side);
                    assert!(position.volume >= 0.01 && position.volume <= 0.05);
                    assert_precision(position.volume, 2);
                }
            }
        }
    }

    #[test]
    fn test_profit_identity_both_sides() {
        for symbol in ["GBPUSD", "XAUUSD"] {
            let generator = PositionGenerator::new(symbol);
            let multiplier = generator.class().profit_multiplier();

            for side in [PositionSide::Buy, PositionSide::Sell] {
                for _ in 0..500 {
                    let position = generator.generate(side);
                    let expected = round_dp(
                        side.sign_factor()
                            * (position.price_current - position.price_open)
                            * position.volume
                            * multiplier,
                        2,
                    );
                    assert!(
                        (position.profit - expected).abs() < EPS,
                        "profit {} != expected {} for {:?} {}",
                        position.profit,
                        expected,
                        side,
                        symbol
                    );
                }
            }
        }
    }

    #[test]
    fn test_ticket_within_synthetic_bounds() {
        let generator = PositionGenerator::new("EURUSD");
        for _ in 0..100 {
            let position = generator.generate(PositionSide::Buy);
            assert!(position.ticket >= 1);
            assert!(position.ticket < 100_000 + 1000);
        }
    }
}
