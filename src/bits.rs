// Bit manipulation utilities

/// Bit 26 of a packed node flag word: the node ends a word.
pub(crate) const WORD_BIT: u32 = 1 << 26;

/// Mask of the 26 letter bits.
pub(crate) const LETTER_BITS: u32 = WORD_BIT - 1;

#[inline(always)]
pub(crate) fn set_letter(bits: &mut u32, letter: u8) {
    *bits |= 1u32 << letter;
}

#[inline(always)]
pub(crate) fn test_letter(bits: u32, letter: u8) -> bool {
    (bits >> letter) & 0x01 != 0
}

/// Number of letter bits set below `letter`: the slot of that letter's child.
#[inline(always)]
pub(crate) fn rank(bits: u32, letter: u8) -> usize {
    (bits & LETTER_BITS & ((1u32 << letter) - 1)).count_ones() as usize
}

#[inline(always)]
pub(crate) fn letter_count(bits: u32) -> usize {
    (bits & LETTER_BITS).count_ones() as usize
}

/// Iterates set letter bits in ascending order.
pub(crate) fn letters_of(bits: u32) -> impl Iterator<Item = u8> {
    let mut rest = bits & LETTER_BITS;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let letter = rest.trailing_zeros() as u8;
        rest &= rest - 1;
        Some(letter)
    })
}

/// Words needed for a bitset of `len` bits.
#[inline(always)]
pub(crate) fn words_for(len: usize) -> usize {
    len.div_ceil(64)
}

#[inline(always)]
pub(crate) fn set_bit(a: &mut [u64], k: usize) {
    a[k / 64] |= 1u64 << (k % 64);
}

#[inline(always)]
pub(crate) fn test_bit(a: &[u64], k: usize) -> bool {
    (a[k / 64] >> (k % 64)) & 0x01 != 0
}

pub(crate) fn union_into(dst: &mut [u64], src: &[u64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d |= s;
    }
}

/// True if any bit in `start..end` is set.
pub(crate) fn any_in_range(a: &[u64], start: usize, end: usize) -> bool {
    (start..end).any(|k| test_bit(a, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_and_letters() {
        let mut bits = 0;
        set_letter(&mut bits, 0);
        set_letter(&mut bits, 4);
        set_letter(&mut bits, 25);
        bits |= WORD_BIT;

        assert!(test_letter(bits, 4));
        assert!(!test_letter(bits, 5));
        assert_eq!(rank(bits, 0), 0);
        assert_eq!(rank(bits, 4), 1);
        assert_eq!(rank(bits, 25), 2);
        assert_eq!(letter_count(bits), 3);
        assert_eq!(letters_of(bits).collect::<Vec<_>>(), vec![0, 4, 25]);
    }

    #[test]
    fn test_bitset_ranges() {
        let mut a = vec![0u64; words_for(130)];
        assert_eq!(a.len(), 3);
        set_bit(&mut a, 70);
        assert!(test_bit(&a, 70));
        assert!(any_in_range(&a, 64, 71));
        assert!(!any_in_range(&a, 71, 130));

        let mut b = vec![0u64; 3];
        set_bit(&mut b, 129);
        union_into(&mut a, &b);
        assert!(test_bit(&a, 129));
    }
}
