//! Sorting and searching tables of fixed-width `u32` rows by one column.
//!
//! The sort is the Bentley-McIlroy three-way quicksort: insertion sort below
//! 7 rows, median of three pivot, pseudomedian of nine above 40 rows, and
//! partitioning that gathers keys equal to the pivot so runs of duplicate
//! keys cost nothing to recurse over. It is not stable.

/// Partitions shorter than this are insertion sorted.
const INSERTION_SORT_THRESHOLD: usize = 7;
/// Partitions longer than this take the pseudomedian of nine as pivot.
const NINTHER_THRESHOLD: usize = 40;

/// Sort `rows` in place by `column`.
///
/// Panics if `column >= N`.
pub fn sort_rows<const N: usize>(rows: &mut [[u32; N]], column: usize) {
    assert!(column < N, "Sort column {} out of range for {}-column rows", column, N);
    quicksort(rows, column);
}

/// Sort by `primary`, then sort each run of equal `primary` by `secondary`.
pub fn two_step_sort<const N: usize>(rows: &mut [[u32; N]], primary: usize, secondary: usize) {
    assert!(secondary < N, "Sort column {} out of range for {}-column rows", secondary, N);
    sort_rows(rows, primary);
    for run in rows.chunk_by_mut(|a, b| a[primary] == b[primary]) {
        if run.len() > 1 {
            quicksort(run, secondary);
        }
    }
}

/// Find the lowest row whose `column` equals `key` in rows sorted by `column`.
///
/// Returns `Err` with the insertion point if no row matches.
pub fn binary_row_search<const N: usize>(
    rows: &[[u32; N]],
    column: usize,
    key: u32,
) -> Result<usize, usize> {
    let idx = rows.partition_point(|row| row[column] < key);
    match rows.get(idx) {
        Some(row) if row[column] == key => Ok(idx),
        _ => Err(idx),
    }
}

/// One past the last row of the run of equal `column` values starting at `first`.
pub fn run_end<const N: usize>(rows: &[[u32; N]], column: usize, first: usize) -> usize {
    let value = rows[first][column];
    first + rows[first..].partition_point(|row| row[column] == value)
}

fn quicksort<const N: usize>(rows: &mut [[u32; N]], col: usize) {
    let len = rows.len();
    if len < INSERTION_SORT_THRESHOLD {
        insertion_sort(rows, col);
        return;
    }

    let mut m = len / 2;
    if len > INSERTION_SORT_THRESHOLD {
        let mut l = 0;
        let mut n = len - 1;
        if len > NINTHER_THRESHOLD {
            let s = len / 8;
            l = med3(rows, col, l, l + s, l + 2 * s);
            m = med3(rows, col, m - s, m, m + s);
            n = med3(rows, col, n - 2 * s, n - s, n);
        }
        m = med3(rows, col, l, m, n);
    }
    let pivot = rows[m][col];

    // Layout after partitioning: [== pivot][< pivot][> pivot][== pivot]
    let last = len as isize - 1;
    let (mut a, mut b, mut c, mut d) = (0isize, 0isize, last, last);
    loop {
        while b <= c && rows[b as usize][col] <= pivot {
            if rows[b as usize][col] == pivot {
                rows.swap(a as usize, b as usize);
                a += 1;
            }
            b += 1;
        }
        while c >= b && rows[c as usize][col] >= pivot {
            if rows[c as usize][col] == pivot {
                rows.swap(c as usize, d as usize);
                d -= 1;
            }
            c -= 1;
        }
        if b > c {
            break;
        }
        rows.swap(b as usize, c as usize);
        b += 1;
        c -= 1;
    }

    // Move the pivot-equal ends into the middle.
    let n = len as isize;
    let s = a.min(b - a);
    swap_ranges(rows, 0, (b - s) as usize, s as usize);
    let s = (d - c).min(n - d - 1);
    swap_ranges(rows, b as usize, (n - s) as usize, s as usize);

    let less = (b - a) as usize;
    let greater = (d - c) as usize;
    if less > 1 {
        quicksort(&mut rows[..less], col);
    }
    if greater > 1 {
        quicksort(&mut rows[len - greater..], col);
    }
}

fn insertion_sort<const N: usize>(rows: &mut [[u32; N]], col: usize) {
    for i in 1..rows.len() {
        let mut j = i;
        while j > 0 && rows[j - 1][col] > rows[j][col] {
            rows.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Swap `rows[a..a + n]` with `rows[b..b + n]`.
#[inline]
fn swap_ranges<const N: usize>(rows: &mut [[u32; N]], a: usize, b: usize, n: usize) {
    for i in 0..n {
        rows.swap(a + i, b + i);
    }
}

/// Index of the median of the three indexed keys.
#[inline]
fn med3<const N: usize>(rows: &[[u32; N]], col: usize, a: usize, b: usize, c: usize) -> usize {
    let (xa, xb, xc) = (rows[a][col], rows[b][col], rows[c][col]);
    if xa < xb {
        if xb < xc {
            b
        } else if xa < xc {
            c
        } else {
            a
        }
    } else if xb > xc {
        b
    } else if xa > xc {
        c
    } else {
        a
    }
}
