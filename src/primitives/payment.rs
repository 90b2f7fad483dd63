use chia_protocol::{Bytes, Bytes32};
use clvm_traits::{FromClvm, ToClvm};
use clvm_utils::tree_hash_from_bytes;
use clvmr::{serde::node_to_bytes, Allocator};

/// A single payment an offer requests from a settlement puzzle. Corresponds
/// to the `CREATE_COIN`-shaped tail of a settlement condition: `(puzzle_hash
/// amount memos)`, with `memos` its own (possibly empty) list element.
#[derive(Debug, Clone, PartialEq, Eq, ToClvm, FromClvm)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[clvm(list)]
pub struct Payment {
    pub puzzle_hash: Bytes32,
    pub amount: u64,
    #[clvm(default)]
    pub memos: Vec<Bytes>,
}

impl Payment {
    pub fn new(puzzle_hash: Bytes32, amount: u64) -> Self {
        Self::with_memos(puzzle_hash, amount, Vec::new())
    }

    pub fn with_memos(puzzle_hash: Bytes32, amount: u64, memos: Vec<Bytes>) -> Self {
        Self {
            puzzle_hash,
            amount,
            memos,
        }
    }

    /// The canonical positional form hashing and condition emission build
    /// from: `(puzzle_hash, amount, memos)`. `Payment` is already
    /// `#[clvm(list)]`-derived in this exact field order, so this is a
    /// plain projection rather than a separate encoding path.
    pub fn as_condition_args(&self) -> (Bytes32, u64, &[Bytes]) {
        (self.puzzle_hash, self.amount, &self.memos)
    }
}

/// A [`Payment`] bound to the nonce of the offer that requests it. Every
/// `NotarizedPayment` in a single offer shares the same nonce; see
/// [`crate::builder::notarize_payments`]. The wire shape of a notarized
/// payment is the four-element condition `(nonce puzzle_hash amount
/// memos)`, with `payment`'s fields spliced in after the nonce rather than
/// nested under it as `(nonce . payment)` — [`as_condition`] and
/// [`from_condition`] are the only (de)serialization paths.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct NotarizedPayment {
    pub nonce: Bytes32,
    pub payment: Payment,
}

/// The CLVM-list shape of a notarized payment condition: `(nonce puzzle_hash
/// amount memos)`, with `memos` nested as its own list element — never
/// spliced into the condition's tail.
#[derive(Debug, Clone, PartialEq, Eq, ToClvm, FromClvm)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[clvm(list)]
pub struct NotarizedPaymentCondition {
    pub nonce: Bytes32,
    pub puzzle_hash: Bytes32,
    pub amount: u64,
    pub memos: Vec<Bytes>,
}

impl NotarizedPayment {
    pub fn new(nonce: Bytes32, payment: Payment) -> Self {
        Self { nonce, payment }
    }

    pub fn puzzle_hash(&self) -> Bytes32 {
        self.payment.puzzle_hash
    }

    pub fn amount(&self) -> u64 {
        self.payment.amount
    }

    /// The condition this payment is emitted as inside a settlement
    /// solution: `[nonce, puzzle_hash, amount, memos]`.
    pub fn as_condition(&self) -> NotarizedPaymentCondition {
        NotarizedPaymentCondition {
            nonce: self.nonce,
            puzzle_hash: self.payment.puzzle_hash,
            amount: self.payment.amount,
            memos: self.payment.memos.clone(),
        }
    }

    /// Parses a condition of shape `[nonce, puzzle_hash, amount, memos]`,
    /// peeling the nonce off the front and delegating the rest to
    /// [`Payment`]'s list shape.
    pub fn from_condition(condition: NotarizedPaymentCondition) -> Self {
        Self {
            nonce: condition.nonce,
            payment: Payment {
                puzzle_hash: condition.puzzle_hash,
                amount: condition.amount,
                memos: condition.memos,
            },
        }
    }

    /// A deterministic identity used to detect duplicate requested payments
    /// (spec invariant: no two payments under one asset may share a name).
    pub fn name(&self) -> Bytes32 {
        let mut a = Allocator::new();
        let ptr = self
            .as_condition()
            .to_clvm(&mut a)
            .expect("condition always encodes to CLVM");
        let bytes = node_to_bytes(&a, ptr).expect("serialization never fails for a built tree");
        tree_hash_from_bytes(&bytes)
            .expect("condition serialization is always well formed")
            .into()
    }
}

/// An `(originator_puzzle_hash, message_hash)` pair binding unrelated coin
/// spends into one atomic transaction (spec §4.3 "Announcement set").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Announcement {
    pub originator_puzzle_hash: Bytes32,
    pub message: Bytes32,
}

impl Announcement {
    pub fn new(originator_puzzle_hash: Bytes32, message: Bytes32) -> Self {
        Self {
            originator_puzzle_hash,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clvm_utils::tree_hash;
    use clvmr::serde::node_from_bytes;
    use hex_literal::hex;
    use rstest::rstest;

    #[test]
    fn as_condition_args_projects_fields_in_order() {
        let payment = Payment::with_memos(
            Bytes32::from([4u8; 32]),
            7,
            vec![Bytes::from(vec![1, 2, 3])],
        );
        let (puzzle_hash, amount, memos) = payment.as_condition_args();
        assert_eq!(puzzle_hash, payment.puzzle_hash);
        assert_eq!(amount, payment.amount);
        assert_eq!(memos, payment.memos.as_slice());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(20_000_000_000)]
    #[case(u64::MAX)]
    fn name_is_distinct_from_baseline_amount(#[case] amount: u64) {
        let baseline = NotarizedPayment::new(
            Bytes32::from([1u8; 32]),
            Payment::new(Bytes32::from([2u8; 32]), 1000),
        );
        let varied =
            NotarizedPayment::new(Bytes32::from([1u8; 32]), Payment::new(Bytes32::from([2u8; 32]), amount));

        assert_ne!(baseline.name(), varied.name());
    }

    #[test]
    fn notarized_payment_condition_matches_known_tree_hash() -> anyhow::Result<()> {
        // (0xd951714bbcd0d0af317b3ef432472b57e7c48d3036b4491539c186ce1377cad2
        //     0x2a5cbc6f5076e0517bdb1e4664b3c26e64d27178b65aaa1ae97267eee629113b
        //     0x04a817c800
        //     ())
        //
        // Memos is its own (here empty) list element, not spliced into the
        // condition's tail: four elements on the wire, not three.
        let mut allocator = Allocator::new();
        let expected = node_from_bytes(
            &mut allocator,
            &hex!(
                "
                ffa0d951714bbcd0d0af317b3ef432472b57e7c48d3036b4491539c186ce1377
                cad2ffa02a5cbc6f5076e0517bdb1e4664b3c26e64d27178b65aaa1ae97267eee
                629113bff8504a817c800ff8080
                "
            ),
        )?;

        let nonce = Bytes32::from(hex!(
            "d951714bbcd0d0af317b3ef432472b57e7c48d3036b4491539c186ce1377cad2"
        ));
        let puzzle_hash = Bytes32::from(hex!(
            "2a5cbc6f5076e0517bdb1e4664b3c26e64d27178b65aaa1ae97267eee629113b"
        ));
        let condition = NotarizedPayment::new(nonce, Payment::new(puzzle_hash, 20_000_000_000))
            .as_condition();
        let got = condition.to_clvm(&mut allocator)?;

        assert_eq!(tree_hash(&allocator, got), tree_hash(&allocator, expected));
        Ok(())
    }

    #[test]
    fn memos_nest_as_one_element_not_spliced_into_the_tail() {
        let mut allocator = Allocator::new();
        let nonce = Bytes32::from([1u8; 32]);
        let puzzle_hash = Bytes32::from([2u8; 32]);
        let memo = Bytes::from(vec![0xaa, 0xbb]);

        let condition = NotarizedPayment::new(
            nonce,
            Payment::with_memos(puzzle_hash, 10, vec![memo.clone()]),
        )
        .as_condition();
        let got = condition.to_clvm(&mut allocator).unwrap();

        // (nonce puzzle_hash amount (memo)) — five cons cells: three for the
        // leading scalars, one for the single-element memos list, one more
        // wrapping that list into the outer condition.
        let nested_memos = vec![memo].to_clvm(&mut allocator).unwrap();
        let expected = (nonce, (puzzle_hash, (10u64, (nested_memos, ()))))
            .to_clvm(&mut allocator)
            .unwrap();

        assert_eq!(tree_hash(&allocator, got), tree_hash(&allocator, expected));
    }

    #[test]
    fn notarize_round_trips_through_condition() {
        let nonce = Bytes32::from([7u8; 32]);
        let payment = Payment::new(Bytes32::from([1u8; 32]), 500);
        let notarized = NotarizedPayment::new(nonce, payment.clone());

        let condition = notarized.as_condition();
        let reconstructed = NotarizedPayment::from_condition(condition);

        assert_eq!(reconstructed, notarized);
        assert_eq!(reconstructed.payment, payment);
    }

    #[test]
    fn name_is_sensitive_to_every_field() {
        let a = NotarizedPayment::new(
            Bytes32::from([1u8; 32]),
            Payment::new(Bytes32::from([2u8; 32]), 10),
        );
        let b = NotarizedPayment::new(
            Bytes32::from([1u8; 32]),
            Payment::new(Bytes32::from([2u8; 32]), 11),
        );
        let c = NotarizedPayment::new(
            Bytes32::from([9u8; 32]),
            Payment::new(Bytes32::from([2u8; 32]), 10),
        );

        assert_ne!(a.name(), b.name());
        assert_ne!(a.name(), c.name());
    }
}
