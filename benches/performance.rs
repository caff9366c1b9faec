//! Performance benchmarks for reordering and dispatch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notes_sync::{new_index, update_note, MoveRequest, Note, NotePatch, NoteStore, NotesState};

fn board(lanes: usize, per_lane: usize) -> Vec<Note> {
    let mut notes = Vec::with_capacity(lanes * per_lane);
    for lane in 0..lanes {
        for i in 0..per_lane {
            notes.push(Note {
                id: format!("note-{}-{}", lane, i).into(),
                title: format!("card {}", i),
                lane_id: format!("lane-{}", lane).into(),
                user_id: "user-1".into(),
                index: i as f64,
            });
        }
    }
    notes
}

/// Benchmark index computation with varying lane sizes
fn bench_new_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("new_index");

    for per_lane in [10, 100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("lane_size", per_lane),
            &per_lane,
            |b, &size| {
                let notes = board(4, size);
                let request = MoveRequest {
                    source_id: "note-0-0".into(),
                    source_lane_id: "lane-0".into(),
                    source_index: 0.0,
                    target_lane_id: "lane-1".into(),
                    target_index: (size / 2) as f64,
                };

                b.iter(|| black_box(new_index(&notes, &request)));
            },
        );
    }

    group.finish();
}

/// Benchmark repeated splitting of one gap until precision runs out
fn bench_gap_exhaustion(c: &mut Criterion) {
    c.bench_function("gap_exhaustion", |b| {
        b.iter(|| {
            let mut notes = board(1, 2);
            let mut steps = 0;
            loop {
                let request = MoveRequest {
                    source_id: "new".into(),
                    source_lane_id: "lane-0".into(),
                    source_index: f64::MIN,
                    target_lane_id: "lane-0".into(),
                    target_index: notes[0].index,
                };
                let index = new_index(&notes, &request);
                if index >= notes[1].index || index <= notes[0].index {
                    break;
                }
                notes[1].index = index;
                steps += 1;
            }
            black_box(steps)
        });
    });
}

/// Benchmark dispatch cost with varying store sizes
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for size in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, &size| {
            let store = NoteStore::with_state(NotesState {
                synced: true,
                error: None,
                data: board(1, size),
            });

            b.iter(|| {
                store.dispatch(update_note(
                    NotePatch::new(format!("note-0-{}", size / 2)).with_title("renamed"),
                    None,
                ));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_new_index, bench_gap_exhaustion, bench_dispatch);
criterion_main!(benches);
