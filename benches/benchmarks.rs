// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use criterion::black_box;
use criterion::Criterion;

use gambit::attacks;
use gambit::{legal_moves, Board, CheckmateDetector, Color, Square, SquareSet};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("queen attacks f5 empty board", |b| {
        b.iter(|| attacks::queen_attacks(black_box(Square::F5), SquareSet::none()))
    });

    c.bench_function("knight attacks f5", |b| {
        b.iter(|| attacks::knight_attacks(black_box(Square::F5)))
    });

    c.bench_function("board clone", |b| {
        let board = Board::standard();
        b.iter(|| black_box(&board).clone())
    });

    c.bench_function("legal moves start position", |b| {
        let board = Board::standard();
        b.iter(|| {
            let mut all = SquareSet::none();
            for &id in black_box(&board).pieces_of(Color::White) {
                all |= legal_moves(&board, id);
            }
            all
        });
    });

    c.bench_function("checkmate evaluation ladder mate", |b| {
        let board = Board::from_fen("k7/8/8/8/8/8/Q7/1R5K").unwrap();
        let detector = CheckmateDetector::new(&board).unwrap();
        b.iter(|| detector.checkmated(black_box(&board), Color::Black))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
