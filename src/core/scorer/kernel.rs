//! Sum-of-absolute-differences kernels over byte rows.
//!
//! Every kernel returns the exact integer `Σ |a[i] - b[i]|`. Vector kernels
//! use the hardware SAD instructions (`psadbw` / `vpsadbw` on x86_64,
//! `vabdq_u8` with pairwise widening adds on aarch64) and hand the tail that
//! does not fill a vector to the scalar loop. Because the sums are exact
//! integers, all kernels agree bit for bit.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Available difference kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Portable byte-at-a-time loop
    Scalar,
    /// 16 lanes, x86_64 baseline
    Sse2,
    /// 32 lanes
    Avx2,
    /// 16 lanes, aarch64 baseline
    Neon,
}

impl Kernel {
    /// Widest kernel the running CPU supports
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                Kernel::Avx2
            } else {
                Kernel::Sse2
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            Kernel::Neon
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Kernel::Scalar
        }
    }

    /// Bytes consumed per vector step
    pub fn lanes(self) -> usize {
        match self {
            Kernel::Scalar => 1,
            Kernel::Sse2 | Kernel::Neon => 16,
            Kernel::Avx2 => 32,
        }
    }

    /// Whether this kernel can run on the current CPU
    pub fn is_supported(self) -> bool {
        match self {
            Kernel::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            Kernel::Sse2 => true,
            #[cfg(target_arch = "x86_64")]
            Kernel::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            Kernel::Neon => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    /// Kernel to use for a row of `len` bytes.
    ///
    /// Rows narrower than one vector never enter the vector loop, so they go
    /// straight to the scalar kernel.
    pub fn for_row(self, len: usize) -> Self {
        if len < self.lanes() {
            Kernel::Scalar
        } else {
            self
        }
    }

    /// Sum of absolute differences of two equal-length byte slices.
    ///
    /// Extra bytes in the longer slice are ignored.
    pub fn sum_abs_diff(self, a: &[u8], b: &[u8]) -> u64 {
        let len = a.len().min(b.len());
        let (a, b) = (&a[..len], &b[..len]);

        match self {
            Kernel::Scalar => sum_abs_diff_scalar(a, b),
            #[cfg(target_arch = "x86_64")]
            // SAFETY: SSE2 is part of the x86_64 baseline.
            Kernel::Sse2 => unsafe { sum_abs_diff_sse2(a, b) },
            #[cfg(target_arch = "x86_64")]
            Kernel::Avx2 if is_x86_feature_detected!("avx2") => {
                // SAFETY: AVX2 support was just checked.
                unsafe { sum_abs_diff_avx2(a, b) }
            }
            #[cfg(target_arch = "aarch64")]
            // SAFETY: NEON is part of the aarch64 baseline.
            Kernel::Neon => unsafe { sum_abs_diff_neon(a, b) },
            #[allow(unreachable_patterns)]
            _ => sum_abs_diff_scalar(a, b),
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Scalar => write!(f, "scalar"),
            Kernel::Sse2 => write!(f, "sse2"),
            Kernel::Avx2 => write!(f, "avx2"),
            Kernel::Neon => write!(f, "neon"),
        }
    }
}

/// Scalar reference kernel
#[inline]
pub fn sum_abs_diff_scalar(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn sum_abs_diff_sse2(a: &[u8], b: &[u8]) -> u64 {
    const LANES: usize = 16;
    let chunks = a.len() / LANES;
    let mut acc = _mm_setzero_si128();

    for i in 0..chunks {
        let va = _mm_loadu_si128(a.as_ptr().add(i * LANES) as *const __m128i);
        let vb = _mm_loadu_si128(b.as_ptr().add(i * LANES) as *const __m128i);
        // Two u64 lanes, each the SAD of 8 bytes
        acc = _mm_add_epi64(acc, _mm_sad_epu8(va, vb));
    }

    let mut lanes = [0u64; 2];
    _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, acc);

    let tail = chunks * LANES;
    lanes[0] + lanes[1] + sum_abs_diff_scalar(&a[tail..], &b[tail..])
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn sum_abs_diff_avx2(a: &[u8], b: &[u8]) -> u64 {
    const LANES: usize = 32;
    let chunks = a.len() / LANES;
    let mut acc = _mm256_setzero_si256();

    for i in 0..chunks {
        let va = _mm256_loadu_si256(a.as_ptr().add(i * LANES) as *const __m256i);
        let vb = _mm256_loadu_si256(b.as_ptr().add(i * LANES) as *const __m256i);
        acc = _mm256_add_epi64(acc, _mm256_sad_epu8(va, vb));
    }

    let mut lanes = [0u64; 4];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);

    let tail = chunks * LANES;
    lanes.iter().sum::<u64>() + sum_abs_diff_scalar(&a[tail..], &b[tail..])
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn sum_abs_diff_neon(a: &[u8], b: &[u8]) -> u64 {
    const LANES: usize = 16;
    let chunks = a.len() / LANES;
    let mut acc = vdupq_n_u64(0);

    for i in 0..chunks {
        let va = vld1q_u8(a.as_ptr().add(i * LANES));
        let vb = vld1q_u8(b.as_ptr().add(i * LANES));
        let diff = vabdq_u8(va, vb);
        // u8x16 -> u16x8 -> u32x4, then accumulate into u64x2
        let wide = vpaddlq_u16(vpaddlq_u8(diff));
        acc = vpadalq_u32(acc, wide);
    }

    let tail = chunks * LANES;
    vaddvq_u64(acc) + sum_abs_diff_scalar(&a[tail..], &b[tail..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize, seed: u32) -> Vec<u8> {
        // Deterministic xorshift so every lane sees varied values
        let mut state = seed.max(1);
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xFF) as u8
            })
            .collect()
    }

    fn vector_kernels() -> Vec<Kernel> {
        [Kernel::Sse2, Kernel::Avx2, Kernel::Neon]
            .into_iter()
            .filter(|k| k.is_supported())
            .collect()
    }

    #[test]
    fn scalar_counts_absolute_differences() {
        assert_eq!(sum_abs_diff_scalar(&[0, 10, 255], &[255, 4, 0]), 255 + 6 + 255);
    }

    #[test]
    fn identical_rows_sum_to_zero() {
        let row = pattern(301, 7);
        for kernel in vector_kernels() {
            assert_eq!(kernel.sum_abs_diff(&row, &row), 0);
        }
    }

    #[test]
    fn vector_kernels_match_scalar_for_every_remainder() {
        for len in 0..=130 {
            let a = pattern(len, 11);
            let b = pattern(len, 97);
            let expected = sum_abs_diff_scalar(&a, &b);

            for kernel in vector_kernels() {
                assert_eq!(
                    kernel.sum_abs_diff(&a, &b),
                    expected,
                    "{} kernel disagrees at length {}",
                    kernel,
                    len
                );
            }
        }
    }

    #[test]
    fn maximal_difference_does_not_overflow() {
        let a = vec![0u8; 4096 * 3];
        let b = vec![255u8; 4096 * 3];
        for kernel in vector_kernels() {
            assert_eq!(kernel.sum_abs_diff(&a, &b), 4096 * 3 * 255);
        }
    }

    #[test]
    fn narrow_rows_fall_back_to_scalar() {
        assert_eq!(Kernel::Avx2.for_row(31), Kernel::Scalar);
        assert_eq!(Kernel::Avx2.for_row(32), Kernel::Avx2);
        assert_eq!(Kernel::Sse2.for_row(15), Kernel::Scalar);
    }

    #[test]
    fn detected_kernel_is_supported() {
        assert!(Kernel::detect().is_supported());
    }
}
