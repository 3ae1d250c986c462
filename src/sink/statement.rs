// =================================================================
// sink/statement.rs - Insert Statement Builder
// =================================================================

use chrono::Utc;

use crate::sim::Position;

/// Schema the sink must carry before the feed starts. Creating the table
/// is an operator step; the feed only reminds about it at startup.
pub const POSITIONS_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS positions (\
 symbol SYMBOL INDEX,\
 ticket LONG,\
 type SYMBOL,\
 volume DOUBLE,\
 price_open DOUBLE,\
 price_current DOUBLE,\
 profit DOUBLE,\
 timestamp TIMESTAMP\
) TIMESTAMP(timestamp) PARTITION BY DAY;";

/// Maps one position record to a parameterless SQL INSERT against the
/// `positions` table, eight columns in fixed order. The timestamp is
/// captured at build time, not at generation time.
pub struct InsertStatement<'a> {
    position: &'a Position,
    timestamp_us: i64,
}

impl<'a> InsertStatement<'a> {
    pub fn new(position: &'a Position, timestamp_us: i64) -> Self {
        Self {
            position,
            timestamp_us,
        }
    }

    /// Build a statement stamped with the current wall clock in
    /// microseconds since epoch.
    pub fn now(position: &'a Position) -> Self {
        Self::new(position, Utc::now().timestamp_micros())
    }

    pub fn timestamp_us(&self) -> i64 {
        self.timestamp_us
    }

    pub fn to_sql(&self) -> String {
        let p = self.position;
        format!(
            "INSERT INTO positions (symbol, ticket, type, volume, price_open, price_current, profit, timestamp) \
             VALUES ({}, {}, {}, {}, {}, {}, {}, {})",
            quote(&p.symbol),
            p.ticket,
            quote(p.side.as_str()),
            p.volume,
            p.price_open,
            p.price_current,
            p.profit,
            self.timestamp_us,
        )
    }
}

/// Quote a string literal, doubling embedded single quotes. Symbols come
/// from a fixed configured list, so this is belt-and-braces rather than a
/// general SQL escaping layer.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PositionSide;

    fn sample_position() -> Position {
        Position {
            symbol: "EURUSD".to_string(),
            ticket: 12345,
            side: PositionSide::Buy,
            volume: 0.02,
            price_open: 1.15,
            price_current: 1.151,
            profit: 2.30,
        }
    }

    #[test]
    fn test_encode_fixed_column_order() {
        let position = sample_position();
        let statement = InsertStatement::new(&position, 1_700_000_000_000_000);

        assert_eq!(
            statement.to_sql(),
            "INSERT INTO positions (symbol, ticket, type, volume, price_open, price_current, profit, timestamp) \
             VALUES ('EURUSD', 12345, 'buy', 0.02, 1.15, 1.151, 2.3, 1700000000000000)"
        );
    }

    #[test]
    fn test_encode_sell_side() {
        let mut position = sample_position();
        position.side = PositionSide::Sell;
        position.profit = -2.30;

        let sql = InsertStatement::new(&position, 1).to_sql();
        assert!(sql.contains("'sell'"));
        assert!(sql.contains("-2.3"));
    }

    #[test]
    fn test_quote_doubles_embedded_quotes() {
        assert_eq!(quote("EURUSD"), "'EURUSD'");
        assert_eq!(quote("O'HARE"), "'O''HARE'");
    }

    #[test]
    fn test_now_captures_recent_timestamp() {
        let position = sample_position();
        let before = Utc::now().timestamp_micros();
        let statement = InsertStatement::now(&position);
        let after = Utc::now().timestamp_micros();

        assert!(statement.timestamp_us() >= before);
        assert!(statement.timestamp_us() <= after);
    }
}
