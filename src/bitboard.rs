//! # Bitboard Primitives
//!
//! One bit per cell, bit `r * 8 + c`, row 0 at the top. Everything in this
//! module is branchless shift-and-mask arithmetic over `u64` words:
//!
//! - `wins_and_losses` — for one player's stones, the empty cells that would
//!   complete a four-in-a-row (wins) and the empty cells that would complete
//!   a three-in-a-row (losses, with wins taking priority)
//! - `check_board` — whether a stone mask already contains a four-run or a
//!   three-run
//!
//! The four line directions are computed as four independent lanes. On
//! x86_64 with AVX2 the lanes are packed into one 256-bit register; the
//! scalar path is the reference and the two are bit-identical.
//!
//! Shifts that cross a row boundary wrap in the raw `u64`; each shifted mask
//! is ANDed with the complement of the files a legal step can never land on.

pub type Bitboard = u64;

pub const BOARD_SIZE: usize = 8;
pub const BOARD_CELLS: usize = 64;

pub const FILE_A: Bitboard = 0x0101_0101_0101_0101;
pub const FILE_B: Bitboard = FILE_A << 1;
pub const FILE_C: Bitboard = FILE_A << 2;
pub const FILE_F: Bitboard = FILE_A << 5;
pub const FILE_G: Bitboard = FILE_A << 6;
pub const FILE_H: Bitboard = 0x8080_8080_8080_8080;
pub const FULL: Bitboard = !0;

/// One line direction: the index step plus the wrap-cancelling masks for
/// right shifts (stones ahead of a cell) and left shifts (projecting a
/// pattern onto its gap cell), at distances 1..=3.
struct Lane {
    step: u32,
    right: [Bitboard; 3],
    left: [Bitboard; 3],
}

const LANES: [Lane; 4] = [
    // Horizontal: a right shift by k drags file A..k onto the top files.
    Lane {
        step: 1,
        right: [!FILE_H, !(FILE_H | FILE_G), !(FILE_H | FILE_G | FILE_F)],
        left: [!FILE_A, !(FILE_A | FILE_B), !(FILE_A | FILE_B | FILE_C)],
    },
    // Vertical: shifts fall off the board, nothing wraps.
    Lane {
        step: 8,
        right: [FULL, FULL, FULL],
        left: [FULL, FULL, FULL],
    },
    // Diagonal A1->H8 (+9): column moves like the horizontal case.
    Lane {
        step: 9,
        right: [!FILE_H, !(FILE_H | FILE_G), !(FILE_H | FILE_G | FILE_F)],
        left: [!FILE_A, !(FILE_A | FILE_B), !(FILE_A | FILE_B | FILE_C)],
    },
    // Anti-diagonal H1->A8 (+7): column moves the other way.
    Lane {
        step: 7,
        right: [!FILE_A, !(FILE_A | FILE_B), !(FILE_A | FILE_B | FILE_C)],
        left: [!FILE_H, !(FILE_H | FILE_G), !(FILE_H | FILE_G | FILE_F)],
    },
];

#[inline]
fn shift_right(bb: Bitboard, lane: &Lane, k: u32) -> Bitboard {
    (bb >> (lane.step * k)) & lane.right[(k - 1) as usize]
}

#[inline]
fn shift_left(bb: Bitboard, lane: &Lane, k: u32) -> Bitboard {
    (bb << (lane.step * k)) & lane.left[(k - 1) as usize]
}

/// Raw threat masks for one direction, before intersecting with the empty
/// set. `win` marks gap cells of the patterns `XXX.`, `.XXX`, `XX.X`,
/// `X.XX`; `lose` marks gap cells of `XX.`, `.XX`, `X.X`.
#[inline]
fn lane_threats(bb: Bitboard, lane: &Lane) -> (Bitboard, Bitboard) {
    let r1 = shift_right(bb, lane, 1);
    let r2 = shift_right(bb, lane, 2);
    let r3 = shift_right(bb, lane, 3);

    let mut win = r1 & r2 & r3; // .XXX
    win |= shift_left(bb & r1 & r2, lane, 3); // XXX.
    win |= shift_left(bb & r1 & r3, lane, 2); // XX.X
    win |= shift_left(bb & r2 & r3, lane, 1); // X.XX

    let mut lose = r1 & r2; // .XX
    lose |= shift_left(bb & r1, lane, 2); // XX.
    lose |= shift_left(bb & r2, lane, 1); // X.X

    (win, lose)
}

/// Scalar reference implementation of [`wins_and_losses`].
pub fn wins_and_losses_scalar(stones: Bitboard, empty: Bitboard) -> (Bitboard, Bitboard) {
    let mut win = 0;
    let mut lose = 0;
    for lane in &LANES {
        let (w, l) = lane_threats(stones, lane);
        win |= w;
        lose |= l;
    }
    win &= empty;
    lose &= empty & !win;
    (win, lose)
}

/// Empty cells that would complete a four-in-a-row for the owner of
/// `stones`, and empty cells that would complete a three-in-a-row. A cell
/// that completes both counts as a win only.
///
/// Total on all inputs; returns `(0, 0)` on the empty board.
#[inline]
pub fn wins_and_losses(stones: Bitboard, empty: Bitboard) -> (Bitboard, Bitboard) {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            // Safety: AVX2 support was just verified at runtime.
            return unsafe { avx2::wins_and_losses_avx2(stones, empty) };
        }
    }
    wins_and_losses_scalar(stones, empty)
}

/// Index of the `n`-th set bit of `mask`, counting from the least
/// significant end. `n` must be below `mask.count_ones()`.
#[inline]
pub fn nth_set_bit(mask: Bitboard, n: u32) -> u8 {
    let mut rest = mask;
    for _ in 0..n {
        rest &= rest - 1;
    }
    rest.trailing_zeros() as u8
}

/// Whether `stones` already contains a four-in-a-row, and whether it
/// contains a three-in-a-row. Callers give the four-run priority.
pub fn check_board(stones: Bitboard) -> (bool, bool) {
    let mut is_win = false;
    let mut is_lose = false;
    for lane in &LANES {
        let r1 = shift_right(stones, lane, 1);
        let r2 = shift_right(stones, lane, 2);
        let triple = stones & r1 & r2;
        is_lose |= triple != 0;
        is_win |= triple & shift_right(stones, lane, 3) != 0;
    }
    (is_win, is_lose)
}

#[cfg(target_arch = "x86_64")]
mod avx2 {
    //! The four direction lanes of the extractor packed into one `__m256i`,
    //! one 64-bit element per direction. Same pattern algebra as
    //! [`super::lane_threats`], with the per-lane shift counts and wrap
    //! masks held in vector registers.

    use std::arch::x86_64::*;

    use super::{Bitboard, LANES};

    const STEPS: [u64; 4] = [
        LANES[0].step as u64,
        LANES[1].step as u64,
        LANES[2].step as u64,
        LANES[3].step as u64,
    ];

    const RIGHT_MASKS: [[u64; 4]; 3] = [
        [
            LANES[0].right[0],
            LANES[1].right[0],
            LANES[2].right[0],
            LANES[3].right[0],
        ],
        [
            LANES[0].right[1],
            LANES[1].right[1],
            LANES[2].right[1],
            LANES[3].right[1],
        ],
        [
            LANES[0].right[2],
            LANES[1].right[2],
            LANES[2].right[2],
            LANES[3].right[2],
        ],
    ];

    const LEFT_MASKS: [[u64; 4]; 3] = [
        [
            LANES[0].left[0],
            LANES[1].left[0],
            LANES[2].left[0],
            LANES[3].left[0],
        ],
        [
            LANES[0].left[1],
            LANES[1].left[1],
            LANES[2].left[1],
            LANES[3].left[1],
        ],
        [
            LANES[0].left[2],
            LANES[1].left[2],
            LANES[2].left[2],
            LANES[3].left[2],
        ],
    ];

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn load(values: &[u64; 4]) -> __m256i {
        _mm256_loadu_si256(values.as_ptr() as *const __m256i)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn or_reduce(v: __m256i) -> u64 {
        let lo = _mm256_castsi256_si128(v);
        let hi = _mm256_extracti128_si256(v, 1);
        let folded = _mm_or_si128(lo, hi);
        let swapped = _mm_unpackhi_epi64(folded, folded);
        _mm_cvtsi128_si64(_mm_or_si128(folded, swapped)) as u64
    }

    /// # Safety
    ///
    /// The caller must verify AVX2 support first
    /// (`is_x86_feature_detected!("avx2")`).
    #[target_feature(enable = "avx2")]
    pub unsafe fn wins_and_losses_avx2(
        stones: Bitboard,
        empty: Bitboard,
    ) -> (Bitboard, Bitboard) {
        let b = _mm256_set1_epi64x(stones as i64);

        let steps = load(&STEPS);
        let steps2 = _mm256_add_epi64(steps, steps);
        let steps3 = _mm256_add_epi64(steps2, steps);

        let rm1 = load(&RIGHT_MASKS[0]);
        let rm2 = load(&RIGHT_MASKS[1]);
        let rm3 = load(&RIGHT_MASKS[2]);
        let lm1 = load(&LEFT_MASKS[0]);
        let lm2 = load(&LEFT_MASKS[1]);
        let lm3 = load(&LEFT_MASKS[2]);

        let r1 = _mm256_and_si256(_mm256_srlv_epi64(b, steps), rm1);
        let r2 = _mm256_and_si256(_mm256_srlv_epi64(b, steps2), rm2);
        let r3 = _mm256_and_si256(_mm256_srlv_epi64(b, steps3), rm3);

        // .XXX
        let mut win = _mm256_and_si256(_mm256_and_si256(r1, r2), r3);
        // XXX.
        let t = _mm256_and_si256(_mm256_and_si256(b, r1), r2);
        win = _mm256_or_si256(win, _mm256_and_si256(_mm256_sllv_epi64(t, steps3), lm3));
        // XX.X
        let t = _mm256_and_si256(_mm256_and_si256(b, r1), r3);
        win = _mm256_or_si256(win, _mm256_and_si256(_mm256_sllv_epi64(t, steps2), lm2));
        // X.XX
        let t = _mm256_and_si256(_mm256_and_si256(b, r2), r3);
        win = _mm256_or_si256(win, _mm256_and_si256(_mm256_sllv_epi64(t, steps), lm1));

        // .XX
        let mut lose = _mm256_and_si256(r1, r2);
        // XX.
        let t = _mm256_and_si256(b, r1);
        lose = _mm256_or_si256(lose, _mm256_and_si256(_mm256_sllv_epi64(t, steps2), lm2));
        // X.X
        let t = _mm256_and_si256(b, r2);
        lose = _mm256_or_si256(lose, _mm256_and_si256(_mm256_sllv_epi64(t, steps), lm1));

        let win = or_reduce(win) & empty;
        let lose = or_reduce(lose) & empty & !win;
        (win, lose)
    }
}
