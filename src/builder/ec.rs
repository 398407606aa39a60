use crate::metadata::{ECLevel, Version};

use self::galois::{generator_poly, EXP_TABLE, LOG_TABLE};

// ECC: Error correction codeword generator
//------------------------------------------------------------------------------

/// Splits data codewords into blocks and computes the Reed-Solomon error
/// correction codewords for each.
pub fn ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, version, ec_level);

    let ecc_size_per_block = version.ecc_per_block(ec_level);
    let gen_poly = generator_poly(ecc_size_per_block);
    let ecc_blocks =
        data_blocks.iter().map(|b| ecc_per_block(b, &gen_poly)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

pub fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// Polynomial long division of the data polynomial by the generator
// polynomial; the remainder coefficients are the ecc. The generator is in
// log domain with its leading term omitted
fn ecc_per_block(block: &[u8], gen_poly: &[u8]) -> Vec<u8> {
    let len = block.len();
    let ecc_count = gen_poly.len();

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            *u ^= EXP_TABLE[*v as usize + log_lead_coeff];
        }
    }

    res.split_off(len)
}

/// Interleaves blocks codeword by codeword, shorter blocks running out first.
pub fn interleave<T: Copy, V: std::ops::Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().expect("Blocks is empty");
    let total_size = blocks.iter().map(|b| b.len()).sum();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

// Galois field arithmetic over GF(256)
//------------------------------------------------------------------------------

pub(super) mod galois {

    // Primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
    const PRIM_POLY: u16 = 0x11d;

    // Doubled so log sums up to 508 index without a modulo
    pub const EXP_TABLE: [u8; 510] = build_exp_table();
    pub const LOG_TABLE: [u8; 256] = build_log_table();

    const fn build_exp_table() -> [u8; 510] {
        let mut table = [0u8; 510];
        let mut x: u16 = 1;
        let mut i = 0;
        while i < 255 {
            table[i] = x as u8;
            table[i + 255] = x as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
            i += 1;
        }
        table
    }

    const fn build_log_table() -> [u8; 256] {
        let mut table = [0u8; 256];
        let mut x: u16 = 1;
        let mut i = 0;
        while i < 255 {
            table[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
            i += 1;
        }
        table
    }

    fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// Log-domain coefficients of the degree `degree` generator polynomial
    /// `(x - a^0)(x - a^1)...(x - a^(degree-1))`, leading term omitted.
    pub fn generator_poly(degree: usize) -> Vec<u8> {
        debug_assert!(degree < 255, "Generator degree out of range: {degree}");

        let mut poly = vec![1u8];
        for i in 0..degree {
            let alpha = EXP_TABLE[i];
            let mut next = vec![0u8; poly.len() + 1];
            for (j, &c) in poly.iter().enumerate() {
                next[j] ^= c;
                next[j + 1] ^= mul(c, alpha);
            }
            poly = next;
        }

        poly[1..].iter().map(|&c| LOG_TABLE[c as usize]).collect()
    }

    #[cfg(test)]
    mod galois_tests {
        use super::{generator_poly, mul, EXP_TABLE, LOG_TABLE};

        #[test]
        fn test_exp_log_inverse() {
            for i in 1..=255usize {
                assert_eq!(EXP_TABLE[LOG_TABLE[i] as usize] as usize, i);
            }
        }

        #[test]
        fn test_mul() {
            assert_eq!(mul(0, 7), 0);
            assert_eq!(mul(7, 0), 0);
            assert_eq!(mul(1, 137), 137);
            assert_eq!(mul(2, 2), 4);
            // 0x80 * 2 wraps through the primitive polynomial
            assert_eq!(mul(0x80, 2), 0x1d);
        }

        #[test]
        fn test_generator_poly_7() {
            assert_eq!(generator_poly(7), vec![87, 229, 146, 149, 238, 102, 21]);
        }

        #[test]
        fn test_generator_poly_10() {
            assert_eq!(generator_poly(10), vec![251, 67, 46, 61, 118, 70, 64, 94, 32, 45]);
        }
    }
}
