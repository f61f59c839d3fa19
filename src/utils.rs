use num_traits::PrimInt;

pub fn div_ceil<T: PrimInt>(a: T, b: T) -> T {
    assert!(b != T::zero());
    (a + b - T::one()) / b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_ceil_rounds_up() {
        assert_eq!(div_ceil(0u64, 7), 0);
        assert_eq!(div_ceil(7u64, 7), 1);
        assert_eq!(div_ceil(8u64, 7), 2);
        assert_eq!(div_ceil(240000u64, 60), 4000);
    }
}
