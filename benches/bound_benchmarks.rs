use bucket_boggle::{BoardSize, BucketBoggler, CompactTrie, NodeArena, Trie};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

// Small synthetic dictionary: every 3 to 5 letter string over a few common
// letters that matches a crude consonant/vowel pattern.
fn dictionary() -> Vec<String> {
    const CONSONANTS: &[u8] = b"lnrst";
    const VOWELS: &[u8] = b"aeio";
    let mut words = Vec::new();
    for &a in CONSONANTS {
        for &b in VOWELS {
            for &c in CONSONANTS {
                words.push(String::from_utf8(vec![a, b, c]).unwrap());
                for &d in VOWELS {
                    words.push(String::from_utf8(vec![a, b, c, d]).unwrap());
                    for &e in CONSONANTS {
                        words.push(String::from_utf8(vec![a, b, c, d, e]).unwrap());
                    }
                }
            }
        }
    }
    words
}

const BOARDS: [&str; 3] = [
    "s e p e a u h t c",
    "lnrst aeio lnrst aeio lnrst aeio lnrst aeio lnrst",
    "st ae lr io n ae rs t ei",
];

fn build_benchmarks(c: &mut Criterion) {
    let words = dictionary();
    let trie = Trie::from_words(&words);
    let mut group = c.benchmark_group("Compact Trie Build");

    group.bench_function("depth first", |b| {
        b.iter(|| black_box(CompactTrie::build(&trie, NodeArena::new()).unwrap()))
    });
    group.bench_function("breadth first", |b| {
        b.iter(|| black_box(CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap()))
    });

    group.finish();
}

fn bound_benchmarks(c: &mut Criterion) {
    let words = dictionary();
    let trie = Trie::from_words(&words);
    let compact = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();
    let mut group = c.benchmark_group("Upper Bound");

    for (i, board) in BOARDS.iter().enumerate() {
        group.bench_with_input(BenchmarkId::new("Trie", i), board, |b, board| {
            let mut bb = BucketBoggler::new(&trie, BoardSize::default());
            bb.parse_board(board).unwrap();
            b.iter(|| black_box(bb.simple_upper_bound()))
        });

        group.bench_with_input(BenchmarkId::new("CompactTrie", i), board, |b, board| {
            let mut bb = BucketBoggler::new(compact.root(), BoardSize::default());
            bb.parse_board(board).unwrap();
            b.iter(|| black_box(bb.simple_upper_bound()))
        });

        group.bench_with_input(BenchmarkId::new("CompactTrie/tree", i), board, |b, board| {
            let mut bb = BucketBoggler::new(compact.root(), BoardSize::default());
            bb.set_build_tree(true);
            bb.parse_board(board).unwrap();
            b.iter(|| {
                bb.simple_upper_bound();
                black_box(bb.take_tree())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, build_benchmarks, bound_benchmarks);
criterion_main!(benches);
