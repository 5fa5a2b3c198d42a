//! Unit application, conversion and temperature handling

use dimcalc_core::rates::{NoRates, RateTable};
use dimcalc_core::{evaluate, evaluate_with_rates, CalcError, EvalConfig, Number, Result, Unit, Value};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn run(tokens: &[&str]) -> Result<Vec<String>> {
    evaluate(tokens, &EvalConfig::default())
}

fn unit(text: &str) -> Unit {
    Unit::parse(text).unwrap()
}

fn convert(n: i64, from: &str, to: &str) -> Number {
    unit(from)
        .convert(&Number::from(n), &unit(to), &NoRates)
        .unwrap()
}

#[test]
fn test_attach_and_convert() {
    assert_eq!(run(&["5 km"]).unwrap(), vec!["5 km"]);
    assert_eq!(run(&["1 mi km"]).unwrap(), vec!["1.6093 km"]);
    assert_eq!(run(&["1 gal l"]).unwrap(), vec!["3.7854 l"]);
    assert_eq!(run(&["1 lb g"]).unwrap(), vec!["453.5924 g"]);
    assert_eq!(run(&["1 day s"]).unwrap(), vec!["86400 s"]);
    assert_eq!(run(&["90 km/hr m/s"]).unwrap(), vec!["25 m/s"]);
}

#[test]
fn test_additive_conversion_uses_left_unit() {
    assert_eq!(run(&["1 km 500 m +"]).unwrap(), vec!["1.5 km"]);
    assert_eq!(run(&["500 m 1 km +"]).unwrap(), vec!["1500 m"]);
    assert_eq!(run(&["1 ft 6 in -"]).unwrap(), vec!["0.5 ft"]);
    assert!(matches!(run(&["1 kg 1 m +"]), Err(CalcError::IncompatibleUnits { .. })));
    assert!(matches!(run(&["1 kg 1 +"]), Err(CalcError::IncompatibleUnits { .. })));
}

#[test]
fn test_unit_algebra() {
    assert_eq!(run(&["2 m 3 m *"]).unwrap(), vec!["6 m²"]);
    assert_eq!(run(&["6 m² 2 m /"]).unwrap(), vec!["3 m"]);
    assert_eq!(run(&["1 km 100 m *"]).unwrap(), vec!["0.1 km²"]);
    assert_eq!(run(&["3 m 2 **"]).unwrap(), vec!["9 m²"]);
    assert_eq!(run(&["4 s r"]).unwrap(), vec!["0.25 1/s"]);
    assert_eq!(run(&["4 1/s"]).unwrap(), vec!["4 1/s"]);
    assert_eq!(run(&["4 s r 1/min"]).unwrap(), vec!["15 1/min"]);
    assert_eq!(run(&["10 m 3 %"]).unwrap(), vec!["1 m"]);
    assert_eq!(run(&["10 m 2 m /"]).unwrap(), vec!["5"]);
    assert!(matches!(
        run(&["4 m 0.5 **"]),
        Err(CalcError::NonIntegralExponent(_))
    ));
    assert!(matches!(
        run(&["2 2 m **"]),
        Err(CalcError::DimensionedOperationNotSupported(_))
    ));
}

#[test]
fn test_strip_units() {
    assert_eq!(run(&["3 m num"]).unwrap(), vec!["3"]);
    assert_eq!(run(&["3 m", "4 s *", "num"]).unwrap(), vec!["12"]);
}

#[test]
fn test_derived_units() {
    assert_eq!(run(&["2 kg 3 m * 1 s / 1 s /"]).unwrap(), vec!["6 N"]);
    assert_eq!(run(&["1 kg 1 m² * 1 s² /"]).unwrap(), vec!["1 J"]);

    let config = EvalConfig::default().with_base_units_only(true);
    assert_eq!(
        evaluate(&["2 kg 3 m * 1 s / 1 s /"], &config).unwrap(),
        vec!["6 kg·m/s²"]
    );
    let config = config.with_superscript(false);
    assert_eq!(
        evaluate(&["2 kg 3 m * 1 s / 1 s /"], &config).unwrap(),
        vec!["6 kg·m/s^2"]
    );
}

#[test]
fn test_unit_expressions() {
    assert!(unit("kg·m/s^2").compatible(&unit("N")));
    assert!(unit("km/hr").compatible(&unit("mi/hr")));
    assert!(unit("m²").compatible(&unit("ft^2")));
    assert!(!unit("m").compatible(&unit("m²")));
    assert!(Unit::parse("m·ft").is_err());
    assert!(Unit::parse("furlong").is_err());
    assert!(unit("num").is_dimensionless());
}

#[test]
fn test_compatibility_is_reflexive_and_symmetric() {
    let units = ["m", "km/hr", "kg", "°C", "°FΔ", "usd", "J", "m/s²"];
    for a in units {
        assert!(unit(a).compatible(&unit(a)), "{a} vs itself");
        for b in units {
            assert_eq!(unit(a).compatible(&unit(b)), unit(b).compatible(&unit(a)), "{a} vs {b}");
        }
    }
}

#[test]
fn test_round_trip_conversion() {
    for (from, to) in [("mi", "km"), ("gal", "ml"), ("oz", "kg"), ("hr", "ms"), ("ft²", "m²")] {
        let n = Number::from(7);
        let there = unit(from).convert(&n, &unit(to), &NoRates).unwrap();
        let back = unit(to).convert(&there, &unit(from), &NoRates).unwrap();
        assert_eq!(back, n, "{from} -> {to} -> {from}");
    }
}

#[test]
fn test_temperature_readings() {
    assert_eq!(convert(0, "°C", "°F"), Number::from(32));
    assert_eq!(convert(100, "°C", "°F"), Number::from(212));
    assert_eq!(convert(-40, "°F", "°C"), Number::from(-40));
    assert_eq!(convert(212, "F", "C"), Number::from(100));
    assert_eq!(run(&["100 °C °F"]).unwrap(), vec!["212 °F"]);
}

#[test]
fn test_temperature_differences_have_no_offset() {
    assert_eq!(convert(10, "°CΔ", "°FΔ"), Number::from(18));
    assert_eq!(convert(9, "dF", "dC"), Number::from(5));
    assert_eq!(run(&["9 dF 5 dC /"]).unwrap(), vec!["1"]);
}

#[test]
fn test_temperature_addition() {
    assert_eq!(run(&["20 °C 10 °CΔ +"]).unwrap(), vec!["30 °C"]);
    assert_eq!(run(&["20 °C 18 °FΔ +"]).unwrap(), vec!["30 °C"]);
    assert_eq!(run(&["10 °CΔ 20 °C +"]).unwrap(), vec!["30 °C"]);
    assert_eq!(run(&["20 °C 5 °C -"]).unwrap(), vec!["15 °C"]);
    assert!(matches!(
        run(&["20 °C 68 °F +"]),
        Err(CalcError::IncompatibleUnits { .. })
    ));
}

#[test]
fn test_temperature_rates() {
    assert_eq!(run(&["10 °C 2 s /"]).unwrap(), vec!["5 °C/s"]);
    assert_eq!(run(&["100 °C 50 °C /"]).unwrap(), vec!["2"]);
    assert!(matches!(
        run(&["1 °C 1 °C *"]),
        Err(CalcError::DimensionedOperationNotSupported(_))
    ));
}

#[test]
fn test_temperature_is_rejected_on_non_temperature_units() {
    assert!(matches!(run(&["1 m °C"]), Err(CalcError::IncompatibleUnits { .. })));
}

#[test]
fn test_currency_needs_rates() {
    match run(&["10 usd eur"]) {
        Err(err @ CalcError::ConversionFailed { .. }) => assert!(err.to_string().contains("USD")),
        other => panic!("expected conversion failure, got {other:?}"),
    }
    // same currency never consults the resolver
    assert_eq!(run(&["10 usd 5 $ +"]).unwrap(), vec!["15 USD"]);
}

#[test]
fn test_currency_with_rate_table() {
    let mut rates = RateTable::new("USD");
    rates.set_rate("EUR", Decimal::new(5, 1));
    rates.set_rate("GBP", Decimal::new(25, 2));
    let config = EvalConfig::default();

    let eval = |tokens: &[&str]| evaluate_with_rates(tokens, &config, rates.clone()).unwrap();
    assert_eq!(eval(&["10 usd eur"]), vec!["5 EUR"]);
    assert_eq!(eval(&["10 € $"]), vec!["20 USD"]);
    assert_eq!(eval(&["10 eur gbp"]), vec!["5 GBP"]);
    assert_eq!(eval(&["10 usd 10 eur +"]), vec!["30 USD"]);
    assert_eq!(eval(&["4 usd/l eur/l"]), vec!["2 EUR/l"]);

    let err = evaluate_with_rates(&["1 usd jpy"], &config, rates.clone()).unwrap_err();
    assert!(matches!(err, CalcError::ConversionFailed { .. }));
}

#[test]
fn test_rate_document() {
    let rates: RateTable = r#"{"base": "usd", "rates": {"EUR": 0.5, "JPY": "150"}}"#
        .parse()
        .unwrap();
    assert_eq!(rates.base(), "USD");
    assert_eq!(rates.len(), 2);
    let lines = evaluate_with_rates(&["3 usd yen"], &EvalConfig::default(), rates).unwrap();
    assert_eq!(lines, vec!["450 JPY"]);
}

#[test]
fn test_value_apply() {
    let bare = Value::scalar(Number::from(5));
    let km = bare.apply(&unit("km"), &NoRates).unwrap();
    assert_eq!(km.to_string(), "5 km");
    let m = km.apply(&unit("m"), &NoRates).unwrap();
    assert_eq!(m, Value::new(Number::from(5000), unit("m")));
    assert!(matches!(
        m.apply(&unit("s"), &NoRates),
        Err(CalcError::IncompatibleUnits { .. })
    ));
}
