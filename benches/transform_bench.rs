//! Transform Benchmark
//!
//! Measures destructuring lowering and generation throughput on synthesized
//! programs.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use unravel::{GenerateOptions, TransformOptions, generate, transform};
use unravel_test_utils::parse;

const SIMPLE_SOURCE: &str = r#"
var [a, b] = pair();
var {x, y: [z, w]} = point;
[a, b] = [b, a];
function add([l, r]) { return l + r; }
"#;

fn generate_large_source(functions: usize, statements_per_fn: usize) -> String {
    let mut source = String::with_capacity(functions * statements_per_fn * 64);
    for f in 0..functions {
        source.push_str(&format!("function fn{f}([p{f}, q{f}], {{r{f}}}) {{\n"));
        for s in 0..statements_per_fn {
            match s % 4 {
                0 => source.push_str(&format!("    var [a{s}, [b{s}, c{s}]] = get({s});\n")),
                1 => source.push_str(&format!("    ({{k{s}, m: n{s}}} = obj{s});\n")),
                2 => source.push_str(&format!("    [x{s}, y{s}] = [y{s}, x{s}];\n")),
                _ => source.push_str(&format!("    use([d{s}] = [e{s}] = list());\n")),
            }
        }
        source.push_str("    return p + q;\n}\n");
    }
    source
}

fn bench_transform_simple(c: &mut Criterion) {
    let options = TransformOptions::default();
    c.bench_function("transform_simple", |b| {
        b.iter(|| {
            let tree = transform(parse(SIMPLE_SOURCE), &options).expect("transform failed");
            black_box(generate(&tree, &GenerateOptions::compact()))
        })
    });
}

fn bench_transform_throughput(c: &mut Criterion) {
    let options = TransformOptions::default();
    let mut group = c.benchmark_group("transform_throughput");
    for (functions, statements) in [(10, 8), (50, 8), (100, 16)] {
        let source = generate_large_source(functions, statements);
        let label = format!("{functions}fn_{statements}stmt");
        group.throughput(Throughput::Bytes(source.len() as u64));
        let tree = parse(&source);
        group.bench_with_input(BenchmarkId::new("lower", &label), &tree, |b, tree| {
            b.iter(|| black_box(transform(tree.clone(), &options).expect("transform failed")))
        });
        group.bench_with_input(BenchmarkId::new("lower_and_generate", &label), &tree, |b, tree| {
            b.iter(|| {
                let lowered = transform(tree.clone(), &options).expect("transform failed");
                black_box(generate(&lowered, &GenerateOptions::default()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform_simple, bench_transform_throughput);
criterion_main!(benches);
