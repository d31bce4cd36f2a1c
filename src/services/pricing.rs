//! Cálculo de precios
//!
//! Un día facturable es cualquier fracción de 24 horas: la duración se
//! redondea siempre hacia arriba.

use chrono::{DateTime, Duration, Utc};

/// Días facturables entre `start` y `end`; 0 si el intervalo es vacío o negativo
pub fn duration_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let span = end - start;
    if span <= Duration::zero() {
        return 0;
    }

    let whole = span.num_days();
    if span > Duration::days(whole) {
        whole + 1
    } else {
        whole
    }
}

/// Precio total = días facturables × precio por día
pub fn price(price_per_day: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    duration_days(start, end) as f64 * price_per_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_whole_days() {
        assert_eq!(duration_days(at(1, 0), at(4, 0)), 3);
        assert_eq!(price(250.0, at(1, 0), at(4, 0)), 750.0);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        assert_eq!(duration_days(at(1, 0), at(3, 12)), 3);
        assert_eq!(price(1000.0, at(1, 0), at(3, 12)), 3000.0);

        assert_eq!(duration_days(at(1, 0), at(2, 1)), 2);
        assert_eq!(duration_days(at(1, 10), at(1, 11)), 1);
    }

    #[test]
    fn test_one_second_over_a_day() {
        let start = at(1, 0);
        let end = start + Duration::days(1) + Duration::seconds(1);
        assert_eq!(duration_days(start, end), 2);
    }

    #[test]
    fn test_empty_or_inverted_range_is_zero() {
        assert_eq!(duration_days(at(2, 0), at(2, 0)), 0);
        assert_eq!(duration_days(at(3, 0), at(2, 0)), 0);
        assert_eq!(price(500.0, at(3, 0), at(2, 0)), 0.0);
    }

    #[test]
    fn test_free_vehicle() {
        assert_eq!(price(0.0, at(1, 0), at(5, 0)), 0.0);
    }
}
