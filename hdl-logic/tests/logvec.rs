use hdl_logic::{LogicError, Logvec, Plain, Signed, Span, Unsigned};
use quickcheck_macros::quickcheck;
use rstest::rstest;

fn byte() -> Span {
    Span::new(7, 0).unwrap()
}

fn uns(value: i128) -> Logvec<Unsigned> {
    Logvec::from_int(byte(), value).unwrap()
}

fn sig(value: i128) -> Logvec<Signed> {
    Logvec::from_int(byte(), value).unwrap()
}

#[test]
fn vector_arithmetic_scenarios() {
    assert_eq!(uns(13) + uns(42), uns(55));

    let product = sig(42) * sig(-13);
    assert_eq!(
        product,
        Logvec::<Signed>::from_int(Span::new(15, 0).unwrap(), -546).unwrap()
    );

    let dividend = Logvec::<Signed>::from_int(Span::new(15, 0).unwrap(), -1337).unwrap();
    let (quot, rem) = dividend.divmod(&sig(13)).unwrap();
    assert_eq!(quot.to_i128().unwrap(), -102);
    assert_eq!(rem.to_i128().unwrap(), -11);
}

#[test]
fn unknown_propagation_scenario() {
    let sum = uns(42) + Logvec::<Unsigned>::parse(byte(), "00Z00001").unwrap();
    assert_eq!(sum, Logvec::<Unsigned>::parse(byte(), "0XX01011").unwrap());
}

#[test]
fn dont_care_equality_scenario() {
    let vec: Logvec = 42u32.into();
    let other: Logvec = 13u32.into();
    assert!(vec.matches("10_10-0"));
    assert!(!other.matches("10_10-0"));
}

#[rstest]
#[case("", "")]
#[case("0", "0")]
#[case("00101010", "00101010")]
#[case("01Z0X1", "01Z0X1")]
fn binary_round_trip(#[case] input: &str, #[case] rendered: &str) {
    let vec: Logvec = input.parse().unwrap();
    assert_eq!(vec.to_string(), rendered);
}

#[rstest]
#[case(42, "052", "2a", "2A", "42")]
#[case(0, "000", "00", "00", "0")]
#[case(255, "377", "ff", "FF", "255")]
fn formatting_bases(
    #[case] value: i128,
    #[case] octal: &str,
    #[case] lower: &str,
    #[case] upper: &str,
    #[case] decimal: &str,
) {
    let vec = uns(value);
    assert_eq!(format!("{vec:o}"), octal);
    assert_eq!(format!("{vec:x}"), lower);
    assert_eq!(format!("{vec:X}"), upper);
    assert_eq!(vec.to_u128().unwrap().to_string(), decimal);
}

#[test]
fn decimal_needs_driven_bits() {
    let vec: Logvec = Logvec::parse(byte(), "00Z00001").unwrap();
    assert_eq!(vec.clone().unsigned().to_u128(), Err(LogicError::UnknownBits));
    assert_eq!(vec.signed().to_i128(), Err(LogicError::UnknownBits));
}

#[test]
fn empty_vector_is_legal() {
    let empty = Logvec::<Unsigned>::empty();
    assert_eq!(empty.len(), 0);
    assert_eq!(empty.to_string(), "");
    assert_eq!(format!("{empty:x}"), "0");
    assert_eq!(empty.to_u128().unwrap(), 0);
}

#[test]
fn flavor_views_share_bits() {
    let vec: Logvec = Logvec::parse(byte(), "11110011").unwrap();
    assert_eq!(vec.clone().unsigned().to_u128().unwrap(), 243);
    assert_eq!(vec.clone().signed().to_i128().unwrap(), -13);
    assert_eq!(vec.clone().unsigned().plain(), vec);
}

#[quickcheck]
fn construction_round_trips(value: u8) -> bool {
    let vec = uns(value as i128);
    Logvec::<Unsigned>::from_bits(byte(), vec.iter()).unwrap() == vec
}

#[quickcheck]
fn identity_slice(value: u16) -> bool {
    let vec = Logvec::<Plain>::from_int(Span::new(15, 0).unwrap(), value as i128).unwrap();
    vec.slice(-1, 0).unwrap() == vec
}

#[quickcheck]
fn addition_is_modular(a: u8, b: u8) -> bool {
    let sum = uns(a as i128) + uns(b as i128);
    sum.to_u128().unwrap() == (a as u128 + b as u128) % 256
}

#[quickcheck]
fn subtraction_is_modular(a: u8, b: u8) -> bool {
    let difference = uns(a as i128) - uns(b as i128);
    difference.to_u128().unwrap() == (a as u128).wrapping_sub(b as u128) % 256
}

#[quickcheck]
fn multiplication_widens(a: u8, b: u8) -> bool {
    let product = uns(a as i128) * uns(b as i128);
    product.len() == 16 && product.to_u128().unwrap() == a as u128 * b as u128
}

#[quickcheck]
fn division_agrees_with_integers(a: u8, b: u8) -> bool {
    if b == 0 {
        return uns(a as i128).divmod(&uns(0)).is_err();
    }

    let (quot, rem) = uns(a as i128).divmod(&uns(b as i128)).unwrap();
    quot.to_u128().unwrap() == (a / b) as u128 && rem.to_u128().unwrap() == (a % b) as u128
}

#[quickcheck]
fn signed_negation(value: i8) -> bool {
    if value == i8::MIN {
        // -(-128) has no 8-bit representation; negation wraps back around.
        return (-sig(value as i128)).to_i128().unwrap() == value as i128;
    }

    (-sig(value as i128)).to_i128().unwrap() == -(value as i128)
}

#[quickcheck]
fn signed_round_trip(value: i8) -> bool {
    sig(value as i128).to_i128().unwrap() == value as i128
}

#[quickcheck]
fn unsigned_comparison_agrees_with_integers(a: u8, b: u8) -> bool {
    uns(a as i128).cmp(&uns(b as i128)) == a.cmp(&b)
}

#[test]
fn widths_align_to_the_wider_operand() {
    let narrow: Logvec<Unsigned> = "11".parse().unwrap();
    let sum = uns(1) + narrow;
    assert_eq!(sum.len(), 8);
    assert_eq!(sum.to_u128().unwrap(), 4);

    let negative: Logvec<Signed> = "11".parse().unwrap();
    let sum = sig(0) + negative;
    assert_eq!(sum.to_i128().unwrap(), -1);
}

#[test]
fn enlargement_keeps_the_low_index() {
    let vec = Logvec::<Unsigned>::from_int(Span::new(11, 4).unwrap(), 3).unwrap();
    let wide = Logvec::<Unsigned>::from_int(Span::new(15, 0).unwrap(), 5).unwrap();
    let sum = vec + wide;
    assert_eq!(sum.len(), 16);
    assert_eq!(sum.span(), Span::new(19, 4).unwrap());
}

#[test]
fn rotation_preserves_bits() {
    let vec: Logvec = "1101Z0X0".parse().unwrap();
    assert_eq!(vec.rotate_left(3).rotate_right(3), vec);
    assert_eq!(vec.rotate_left(11), vec.rotate_left(3));
}
