use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;
use swap_form_engine::catalog::currency_catalog::{CatalogPolicy, CurrencyCatalog};
use swap_form_engine::catalog::entry::CurrencyEntry;
use swap_form_engine::config::FormConfig;
use swap_form_engine::core::amount::{AmountField, Field};
use swap_form_engine::core::currency::{AssetCode, CurrencyCode};
use swap_form_engine::form::transaction::TransactionForm;

/// Successive input states while typing "1,234,567.8912".
const KEYSTROKES: [&str; 11] = [
    "1", "12", "123", "1,234", "12,345", "123,456", "1,234,567", "1,234,567.", "1,234,567.8",
    "1,234,567.89", "1,234,567.8912",
];

fn bench_single_field_typing(c: &mut Criterion) {
    c.bench_function("amount_field_typing", |b| {
        b.iter(|| {
            let mut field = AmountField::send();
            for raw in KEYSTROKES {
                let _ = field.apply_input(black_box(raw));
            }
            field
        })
    });
}

fn bench_form_typing_with_rate(c: &mut Criterion) {
    let config = FormConfig::default();
    c.bench_function("form_typing_with_rate", |b| {
        b.iter(|| {
            let mut form = TransactionForm::new(&config);
            form.set_rate(Some(dec!(1532.25)));
            for raw in KEYSTROKES {
                let _ = form.input(Field::Send, black_box(raw));
            }
            form
        })
    });
}

fn bench_catalog_rebuild(c: &mut Criterion) {
    let config = FormConfig::default();
    let policy = CatalogPolicy::new(&config);
    let base = CurrencyCatalog::new(
        (0..200)
            .map(|i| CurrencyEntry::new(CurrencyCode::new(format!("C{:02}", i % 100)), "Currency"))
            .chain(std::iter::once(CurrencyEntry::new(CurrencyCode::new("NGN"), "Naira")))
            .collect(),
    );
    let pegged = AssetCode::new("cNGN");

    c.bench_function("catalog_rebuild_200", |b| {
        b.iter(|| {
            base.apply_asset_rule(black_box(Some(&pegged)), None, &policy)
                .catalog
                .apply_locale_rank("ng")
        })
    });
}

criterion_group!(
    benches,
    bench_single_field_typing,
    bench_form_typing_with_rate,
    bench_catalog_rebuild
);
criterion_main!(benches);
