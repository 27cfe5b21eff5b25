use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::Rng;
use roi_engine::calculation::calculator::{CalculationInput, RoiCalculator};
use roi_engine::core::catalog::{ScenarioCatalog, ScenarioType};
use roi_engine::core::currency::{CurrencyCode, FxRateTable};
use roi_engine::recording::{EventSink, RecordError, RecordedEvent, Recorder};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "CAD", "AUD", "JPY"];

/// Accepts and drops every event so the benchmark does not accumulate them.
struct DiscardSink;

impl EventSink for DiscardSink {
    fn write(&self, _event: &RecordedEvent) -> Result<(), RecordError> {
        Ok(())
    }
}

fn calculator() -> RoiCalculator {
    RoiCalculator::new(ScenarioCatalog::builtin().unwrap(), FxRateTable::standard())
}

/// Random valid requests spread across the whole catalog.
fn random_inputs(catalog: &ScenarioCatalog, count: usize) -> Vec<CalculationInput> {
    let mut rng = rand::thread_rng();
    let categories: Vec<&str> = catalog.categories().map(|(key, _)| key).collect();
    (0..count)
        .map(|_| {
            let category = *categories.choose(&mut rng).unwrap();
            let scenario_type = *ScenarioType::ALL.choose(&mut rng).unwrap();
            let currency = *CURRENCIES.choose(&mut rng).unwrap();
            let investment = Decimal::from(rng.gen_range(1_000u64..=100_000_000));
            CalculationInput::new(investment, category, scenario_type.key())
                .with_currency(CurrencyCode::new(currency))
        })
        .collect()
}

fn bench_single_calculation(c: &mut Criterion) {
    let calc = calculator();
    let input = CalculationInput::new(dec!(50000), "marketing-hub", "realistic");

    c.bench_function("calculate_single", |b| {
        b.iter(|| calc.calculate(black_box(&input)))
    });
}

fn bench_mixed_calculations(c: &mut Criterion) {
    let calc = calculator();
    let inputs = random_inputs(calc.catalog(), 1000);

    c.bench_function("calculate_1000_mixed", |b| {
        b.iter(|| {
            for input in &inputs {
                let _ = calc.calculate(black_box(input));
            }
        })
    });
}

fn bench_recorded_calculation(c: &mut Criterion) {
    let calc = calculator().with_recorder(Recorder::spawn(DiscardSink).unwrap());
    let input = CalculationInput::new(dec!(50000), "sales-hub", "optimistic")
        .with_currency(CurrencyCode::new("EUR"));

    c.bench_function("calculate_recorded", |b| {
        b.iter(|| calc.calculate(black_box(&input)))
    });
}

fn bench_compare(c: &mut Criterion) {
    let calc = calculator();

    c.bench_function("compare_scenario_types", |b| {
        b.iter(|| calc.compare(black_box(dec!(250000)), "service-hub", &CurrencyCode::usd()))
    });
}

criterion_group!(
    benches,
    bench_single_calculation,
    bench_mixed_calculations,
    bench_recorded_calculation,
    bench_compare
);
criterion_main!(benches);
