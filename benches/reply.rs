use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use hypercube_pir::mock::ClearScheme;
use hypercube_pir::{gen_params, PirClient, PirParams, PirServer, ProtocolPolicy};

fn setup(ele_num: u64) -> (Arc<PirParams>, PirServer<ClearScheme>, PirClient<ClearScheme>) {
    let policy = ProtocolPolicy {
        first_dim: 16,
        dim: 4,
        ..ProtocolPolicy::default()
    };
    let params = Arc::new(gen_params(ele_num, 32, 128, 16, &policy).unwrap());
    let scheme = ClearScheme::new(params.poly_degree, params.logt);

    let db: Vec<u8> = (0..params.ele_num * params.ele_size)
        .map(|i| i as u8)
        .collect();

    let mut server = PirServer::new(&params, scheme.clone());
    server
        .set_database(&db, params.ele_num, params.ele_size)
        .unwrap();

    let client = PirClient::new(&params, scheme);
    server.set_enc_sk(client.enc_sk()).unwrap();

    (params, server, client)
}

fn bench_generate_reply(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_reply");
    group.sample_size(10);

    for ele_num in [256u64, 1024, 4096] {
        let (_, server, client) = setup(ele_num);
        let (query, _) = client.build_query(ele_num / 2);

        group.bench_with_input(
            BenchmarkId::from_parameter(ele_num),
            &ele_num,
            |b, _| b.iter(|| server.generate_reply(&query).unwrap()),
        );
    }
    group.finish();
}

fn bench_generate_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_query");

    for ele_num in [256u64, 1024, 4096] {
        let (_, _, client) = setup(ele_num);
        group.bench_with_input(
            BenchmarkId::from_parameter(ele_num),
            &ele_num,
            |b, _| b.iter(|| client.build_query(ele_num / 3)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_generate_reply, bench_generate_query);
criterion_main!(benches);
