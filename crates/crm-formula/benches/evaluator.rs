//! Evaluator benchmarks using divan
//!
//! Each iteration tokenizes and evaluates from scratch, as every rule
//! evaluation does.

use crm_formula::{FixedClock, FormulaEngine, Record, tokenize};
use serde_json::json;

fn main() {
    divan::main();
}

fn engine() -> FormulaEngine {
    FormulaEngine::new().with_clock(FixedClock::parse("2024-06-15T12:00:00Z").unwrap())
}

fn opportunity() -> Record {
    Record::from_json(json!({
        "name": "Acme Corp - Renewal",
        "amount": 125000,
        "discount": "12.5",
        "stage": "Negotiation",
        "close_date": "2024-09-30",
        "account": {"name": "Acme Corp", "owner": {"email": "owner@acme.test"}},
    }))
    .unwrap()
}

// ============================================================================
// Lexing
// ============================================================================

mod lexing {
    #[divan::bench]
    fn short_formula() -> usize {
        super::tokenize(divan::black_box("ISBLANK(email)")).len()
    }

    #[divan::bench]
    fn long_formula() -> usize {
        super::tokenize(divan::black_box(
            "(stage == 'Closed Won' OR stage == 'Closed Lost') AND (ISBLANK(close_reason) \
             OR LEN(close_reason) < 10) AND NOT REGEX(account.owner.email, '@acme[.]test$')",
        ))
        .len()
    }
}

// ============================================================================
// Evaluation
// ============================================================================

mod evaluation {
    use super::{engine, opportunity};

    #[divan::bench]
    fn required_field(bencher: divan::Bencher) {
        let engine = engine();
        let record = opportunity();
        bencher.bench_local(|| engine.evaluate(divan::black_box("ISBLANK(name)"), &record))
    }

    #[divan::bench]
    fn numeric_comparison(bencher: divan::Bencher) {
        let engine = engine();
        let record = opportunity();
        bencher.bench_local(|| {
            engine.evaluate(divan::black_box("amount > 100000 AND discount >= 10"), &record)
        })
    }

    #[divan::bench]
    fn date_comparison(bencher: divan::Bencher) {
        let engine = engine();
        let record = opportunity();
        bencher.bench_local(|| engine.evaluate(divan::black_box("close_date < TODAY()"), &record))
    }

    #[divan::bench]
    fn function_heavy(bencher: divan::Bencher) {
        let engine = engine();
        let record = opportunity();
        bencher.bench_local(|| {
            engine.evaluate(
                divan::black_box(
                    "CONTAINS(UPPER(name), 'RENEWAL') AND LEFT(account.name, 4) == 'Acme' \
                     AND REGEX(account.owner.email, '^[a-z]+@') AND YEAR(close_date) >= 2024",
                ),
                &record,
            )
        })
    }

    #[divan::bench(args = [1, 16, 128])]
    fn nested_parens(bencher: divan::Bencher, depth: usize) {
        let engine = engine();
        let record = opportunity();
        let formula = format!("{}amount > 1{}", "(".repeat(depth), ")".repeat(depth));
        bencher.bench_local(|| engine.evaluate(divan::black_box(&formula), &record))
    }
}
