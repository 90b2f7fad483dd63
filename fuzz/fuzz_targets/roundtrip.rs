#![no_main]

use chia_offer::primitives::{NotarizedPaymentCondition, Payment};
use clvm_traits::{FromClvm, ToClvm};
use clvmr::Allocator;
use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::fmt;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    roundtrip::<Payment>(&mut u);
    roundtrip::<NotarizedPaymentCondition>(&mut u);
});

fn roundtrip<'a, T>(u: &mut Unstructured<'a>)
where
    T: Arbitrary<'a> + ToClvm<Allocator> + FromClvm<Allocator> + PartialEq + fmt::Debug,
{
    let Ok(obj) = T::arbitrary(u) else { return };
    let mut a = Allocator::new();
    let Ok(ptr) = obj.to_clvm(&mut a) else { return };
    let obj2 = T::from_clvm(&a, ptr).expect("round trip through clvm must parse back");
    assert_eq!(obj, obj2);
}
