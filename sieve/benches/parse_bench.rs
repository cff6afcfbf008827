use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use sieve::{
    parse_query, update_url, FilterableField, Operator, QueryPatch, RawQuery, SieveConfig,
    ValueType,
};

fn test_cases() -> Vec<(&'static str, RawQuery)> {
    vec![
        (
            "simple",
            RawQuery {
                page: Some("2".to_string()),
                ..Default::default()
            },
        ),
        (
            "medium",
            RawQuery {
                page: Some("2".to_string()),
                page_size: Some("50".to_string()),
                sorts: Some("-createdAt,price".to_string()),
                filters: Some("status==active".to_string()),
                ..Default::default()
            },
        ),
        (
            "complex",
            RawQuery {
                page: Some("10".to_string()),
                page_size: Some("100".to_string()),
                sorts: Some("-createdAt,price,-stock,name".to_string()),
                filters: Some(
                    "name@=Test\\, Inc.,price>=10,price<=200,status!=archived,deletedAt==null"
                        .to_string(),
                ),
                ..Default::default()
            },
        ),
    ]
}

fn restricted_config() -> SieveConfig {
    SieveConfig {
        sortable_fields: Some(
            ["createdAt", "price", "stock", "name"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        filterable_fields: Some(vec![
            FilterableField::new(
                "name",
                [Operator::Contains, Operator::ContainsCi],
                ValueType::String,
            ),
            FilterableField::new(
                "price",
                [Operator::GreaterOrEqual, Operator::LessOrEqual],
                ValueType::Number,
            ),
            FilterableField::new(
                "status",
                [Operator::Equals, Operator::NotEquals],
                ValueType::String,
            ),
            FilterableField::new(
                "deletedAt",
                [Operator::IsNull, Operator::IsNotNull],
                ValueType::String,
            ),
        ]),
        ..Default::default()
    }
}

fn benchmark_parse_open_mode(c: &mut Criterion) {
    let config = SieveConfig::default();
    let mut group = c.benchmark_group("parse_open_mode");

    for (name, raw) in test_cases() {
        group.bench_with_input(BenchmarkId::new("parse", name), &raw, |b, raw| {
            b.iter(|| black_box(parse_query(black_box(raw), &config)))
        });
    }

    group.finish();
}

fn benchmark_parse_restricted(c: &mut Criterion) {
    let config = restricted_config();
    let mut group = c.benchmark_group("parse_restricted");

    for (name, raw) in test_cases() {
        group.bench_with_input(BenchmarkId::new("parse", name), &raw, |b, raw| {
            b.iter(|| black_box(parse_query(black_box(raw), &config)))
        });
    }

    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let config = SieveConfig::default();
    let mut group = c.benchmark_group("serialize");

    for (name, raw) in test_cases() {
        let query = parse_query(&raw, &config).query;
        group.bench_with_input(BenchmarkId::new("to_query_string", name), &query, |b, query| {
            b.iter(|| black_box(black_box(query).to_query_string()))
        });
    }

    group.finish();
}

fn benchmark_url_rewrite(c: &mut Criterion) {
    let config = SieveConfig::default();
    let url = "https://api.test/items?view=grid&page=2&pageSize=50&sorts=-createdAt&filters=status%3D%3Dactive";
    let patch = QueryPatch {
        page: Some(3),
        ..Default::default()
    };

    c.bench_function("update_url", |b| {
        b.iter(|| black_box(update_url(black_box(url), &patch, &config)))
    });
}

criterion_group!(
    benches,
    benchmark_parse_open_mode,
    benchmark_parse_restricted,
    benchmark_serialize,
    benchmark_url_rewrite
);
criterion_main!(benches);
