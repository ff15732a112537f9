use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use census::{
    core::country::CountryStore,
    country::CountryRequest,
    person::PersonRequest,
    service::person::PersonService,
    types::{CountryId, Gender, SortOrder},
};

const COUNTRIES: [&str; 4] = ["USA", "Philippines", "Japan", "Chile"];

fn request(i: u32, country: CountryId) -> PersonRequest {
    PersonRequest {
        name: format!("Person {i}"),
        email: format!("p{i}@example.com"),
        birth_date: chrono::NaiveDate::from_ymd_opt(1950 + (i % 60) as i32, 1 + i % 12, 1 + i % 28),
        gender: Some(if i % 2 == 0 { Gender::Female } else { Gender::Male }),
        country_id: Some(country),
        ..PersonRequest::default()
    }
}

fn populated(n: u32) -> PersonService {
    let mut svc = PersonService::in_memory();
    let ids: Vec<CountryId> = COUNTRIES
        .iter()
        .map(|name| svc.countries_mut().add(CountryRequest::new(*name)).expect("country").id)
        .collect();
    for i in 0..n {
        let country = ids[i as usize % ids.len()];
        let _ = svc.add(request(i, country)).expect("add");
    }
    svc
}

fn bench_adds(c: &mut Criterion) {
    c.bench_function("service_add_10k", |b| {
        b.iter(|| populated(10_000));
    });
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let svc = populated(10_000);

    for (field, text) in [("PersonName", "99"), ("Gender", "female"), ("CountryName", "ph")] {
        group.bench_with_input(BenchmarkId::from_parameter(field), &text, |b, text| {
            b.iter(|| {
                let _ = svc.filtered(field, text).expect("filter");
            });
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    let svc = populated(10_000);
    let list = svc.list().expect("list");

    for field in ["PersonName", "BirthDay", "CountryName"] {
        group.bench_with_input(BenchmarkId::from_parameter(field), &field, |b, field| {
            b.iter(|| {
                let _ = svc.sorted(list.clone(), field, SortOrder::Descending);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_adds, bench_filter, bench_sort);
criterion_main!(benches);
