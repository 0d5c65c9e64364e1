//! MD5, implemented in place rather than pulled from a crypto crate.
//!
//! The upstream app API validates an `X-Client-Hash` header computed as
//! `md5(client_time + shared_secret)`. This is a protocol fingerprint,
//! not a security boundary, so the digest must match the reference
//! algorithm bit for bit: little-endian word packing, `0x80` padding with
//! a 64-bit little-endian bit length, and the standard round constants.

const INIT: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

#[rustfmt::skip]
const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

#[rustfmt::skip]
const SINES: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee,
    0xf57c_0faf, 0x4787_c62a, 0xa830_4613, 0xfd46_9501,
    0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be,
    0x6b90_1122, 0xfd98_7193, 0xa679_438e, 0x49b4_0821,
    0xf61e_2562, 0xc040_b340, 0x265e_5a51, 0xe9b6_c7aa,
    0xd62f_105d, 0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8,
    0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed,
    0xa9e3_e905, 0xfcef_a3f8, 0x676f_02d9, 0x8d2a_4c8a,
    0xfffa_3942, 0x8771_f681, 0x6d9d_6122, 0xfde5_380c,
    0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70,
    0x289b_7ec6, 0xeaa1_27fa, 0xd4ef_3085, 0x0488_1d05,
    0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665,
    0xf429_2244, 0x432a_ff97, 0xab94_23a7, 0xfc93_a039,
    0x655b_59c3, 0x8f0c_cc92, 0xffef_f47d, 0x8584_5dd1,
    0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1,
    0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb, 0xeb86_d391,
];

/// Digest `input` and render the 128-bit result as lowercase hex.
pub fn md5_hex(input: &[u8]) -> String {
    let mut hex = String::with_capacity(32);
    for word in md5_words(input) {
        for byte in word.to_le_bytes() {
            hex.push_str(&format!("{:02x}", byte));
        }
    }
    hex
}

fn md5_words(input: &[u8]) -> [u32; 4] {
    // Pad to a 64-byte boundary with room for the trailing bit length.
    let mut message = input.to_vec();
    let bit_len = (input.len() as u64).wrapping_mul(8);
    message.push(0x80);
    while message.len() % 64 != 56 {
        message.push(0);
    }
    message.extend_from_slice(&bit_len.to_le_bytes());

    let [mut a0, mut b0, mut c0, mut d0] = INIT;

    for block in message.chunks_exact(64) {
        let mut words = [0u32; 16];
        for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        let (mut a, mut b, mut c, mut d) = (a0, b0, c0, d0);

        for step in 0..64 {
            let (mix, g) = match step {
                0..=15 => ((b & c) | (!b & d), step),
                16..=31 => ((b & d) | (c & !d), (5 * step + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * step + 5) % 16),
                _ => (c ^ (b | !d), (7 * step) % 16),
            };
            let tmp = a
                .wrapping_add(mix)
                .wrapping_add(words[g])
                .wrapping_add(SINES[step]);
            let rotated = b.wrapping_add(tmp.rotate_left(SHIFTS[step]));
            a = d;
            d = c;
            c = b;
            b = rotated;
        }

        a0 = a0.wrapping_add(a);
        b0 = b0.wrapping_add(b);
        c0 = c0.wrapping_add(c);
        d0 = d0.wrapping_add(d);
    }

    [a0, b0, c0, d0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc_1321_vectors() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"a"), "0cc175b9c0f1b6a831c399e269772661");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(md5_hex(b"message digest"), "f96b697d7cb7938d525a2f31aaf161d0");
        assert_eq!(
            md5_hex(b"abcdefghijklmnopqrstuvwxyz"),
            "c3fcd3d76192e4007dfb496cca67e13b"
        );
        assert_eq!(
            md5_hex(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"),
            "d174ab98d277d9f5a5611c2c9f419d9f"
        );
    }

    #[test]
    fn test_multi_block_input() {
        // 80 bytes forces a second 512-bit block through the compressor.
        let input = b"12345678901234567890123456789012345678901234567890123456789012345678901234567890";
        assert_eq!(md5_hex(input), "57edf4a22be3c955ac49da2e2107b67a");
    }

    #[test]
    fn test_padding_boundary_lengths() {
        // 55, 56 and 64 byte inputs straddle the padding rules.
        assert_eq!(md5_hex(&[b'x'; 55]), md5_hex(&[b'x'; 55]));
        assert_ne!(md5_hex(&[b'x'; 55]), md5_hex(&[b'x'; 56]));
        assert_ne!(md5_hex(&[b'x'; 56]), md5_hex(&[b'x'; 64]));
        assert_eq!(md5_hex(&[b'x'; 64]).len(), 32);
    }

    #[test]
    fn test_utf8_input_hashes_bytes() {
        let signed = format!("{}{}", "2024-01-01T00:00:00.000Z", "secret");
        assert_eq!(md5_hex(signed.as_bytes()).len(), 32);
        assert!(md5_hex(signed.as_bytes())
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
