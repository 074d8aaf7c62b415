use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use psu_powers::{
    Modulus, PowersDag, PowerRule, PlaintextPowers, LevelMap,
    lwe::{LweParameters, LweContext, KeyGenerator, Encryptor},
};

fn ladder(up_to: u32) -> PowersDag {
    let rules = (2..=up_to).map(|p| {
        if p % 2 == 0 {(p, PowerRule::Square(p / 2))} else {(p, PowerRule::Multiply(p - 1, 1))}
    });
    PowersDag::new(rules, 1..=up_to).unwrap()
}

fn powers_benchmark(c: &mut Criterion, name: String, slot_count: usize, up_to: u32, plain_modulus: u64) {

    let get_name = |description: &str| format!("{:>4}/{}", name, description);
    let modulus = Modulus::new(plain_modulus);
    let dag = ladder(up_to);
    let mut rng = rand::thread_rng();
    let values: Vec<u64> = (0..slot_count).map(|_| rng.gen::<u64>() % plain_modulus).collect();

    c.bench_function(&get_name("Compute"), |b| b.iter(|| {
        PlaintextPowers::new(black_box(values.clone()), &modulus, &dag).unwrap()
    }));
    c.bench_function(&get_name("ComputePar"), |b| b.iter(|| {
        PlaintextPowers::new_par(black_box(values.clone()), &modulus, &dag).unwrap()
    }));

    let powers = PlaintextPowers::new(values.clone(), &modulus, &dag).unwrap();
    c.bench_function(&get_name("Exponentiate"), |b| b.iter(|| powers.exponentiate(black_box(up_to)).unwrap()));

    let context = LweContext::new(LweParameters::new()
        .set_dimension(256)
        .set_plain_modulus(modulus)
        .set_coeff_modulus(vec![Modulus::new(0x7fffffd8001), Modulus::new(0x3fffffff000001)])
        .set_noise_bound(16)
    ).unwrap();
    let keygen = KeyGenerator::new(context.clone());
    let encryptor = Encryptor::new(context).set_secret_key(keygen.secret_key().clone());
    let levels = LevelMap::uniform(1);

    c.bench_function(&get_name("ComputeEncrypt"), |b| b.iter(|| {
        let powers = PlaintextPowers::new(black_box(values.clone()), &modulus, &dag).unwrap();
        powers.encrypt(&encryptor, &levels).unwrap()
    }));
    c.bench_function(&get_name("ComputeEncryptPar"), |b| b.iter(|| {
        let powers = PlaintextPowers::new_par(black_box(values.clone()), &modulus, &dag).unwrap();
        powers.encrypt_par(&encryptor, &levels).unwrap()
    }));

}

fn criterion_powers_benchmark(c: &mut Criterion) {
    powers_benchmark(c, "s".to_string(), 256, 8, 65537);
    powers_benchmark(c, "m".to_string(), 1024, 32, 65537);
    powers_benchmark(c, "l".to_string(), 4096, 64, 786433);
}

criterion_group!(bench_powers, criterion_powers_benchmark);
criterion_main!(bench_powers);
