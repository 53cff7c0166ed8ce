//! CIDR prefix derivation from block sizes.

use ipalloc_model::{AllocationRecord, BlockPrefix, ResourceType};

const IPV4_BITS: u32 = 32;
const IPV6_BITS: u64 = 128;

/// IPv4 prefix length of a block of `addresses` addresses.
///
/// Uses `floor(log2(addresses))`, so a block that is not a power of two maps
/// to the prefix of the largest aligned block it contains. Blocks larger than
/// the address space clamp to `/0`. Zero has no prefix.
pub fn prefix_length(addresses: u64) -> Option<u8> {
    if addresses == 0 {
        return None;
    }
    let bits = addresses.ilog2();
    u8::try_from(IPV4_BITS.saturating_sub(bits)).ok()
}

/// Prefix of an IP record. IPv6 feeds already carry the prefix length in
/// the value field; ASN records have none.
pub fn block_prefix(record: &AllocationRecord) -> Option<BlockPrefix> {
    match record.resource_type {
        ResourceType::Ipv4 => prefix_length(record.value).map(|length| BlockPrefix {
            length,
            irregular: !record.value.is_power_of_two(),
        }),
        ResourceType::Ipv6 => {
            let length = u8::try_from(record.value.min(IPV6_BITS)).ok()?;
            Some(BlockPrefix {
                length,
                irregular: record.value > IPV6_BITS,
            })
        }
        ResourceType::Asn => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_model::{IssueDate, Rir, Status};
    use proptest::prelude::*;

    fn record(resource_type: ResourceType, value: u64) -> AllocationRecord {
        AllocationRecord {
            registry: "apnic".to_string(),
            source: Rir::Apnic,
            country_code: "JP".to_string(),
            resource_type,
            start: "1.0.0.0".to_string(),
            value,
            date: IssueDate::Unknown,
            status: Status::Allocated,
            opaque_id: None,
            extensions: None,
        }
    }

    #[test]
    fn common_block_sizes() {
        assert_eq!(prefix_length(1), Some(32));
        assert_eq!(prefix_length(256), Some(24));
        assert_eq!(prefix_length(4096), Some(20));
        assert_eq!(prefix_length(1 << 24), Some(8));
        assert_eq!(prefix_length(1 << 32), Some(0));
        assert_eq!(prefix_length(u64::MAX), Some(0));
        assert_eq!(prefix_length(0), None);
    }

    #[test]
    fn irregular_blocks_use_the_floor() {
        let prefix = block_prefix(&record(ResourceType::Ipv4, 768)).expect("prefix");
        assert_eq!(prefix.length, 23);
        assert!(prefix.irregular);
        assert!(1u64 << (32 - prefix.length) < 768);
        let aligned = block_prefix(&record(ResourceType::Ipv4, 512)).expect("prefix");
        assert_eq!(aligned.length, 23);
        assert!(!aligned.irregular);
    }

    #[test]
    fn ipv6_and_asn_records() {
        let v6 = block_prefix(&record(ResourceType::Ipv6, 32)).expect("prefix");
        assert_eq!(v6.length, 32);
        assert!(!v6.irregular);
        assert_eq!(block_prefix(&record(ResourceType::Ipv6, 500)).map(|p| p.length), Some(128));
        assert_eq!(block_prefix(&record(ResourceType::Asn, 1)), None);
        assert_eq!(block_prefix(&record(ResourceType::Ipv4, 0)), None);
    }

    proptest! {
        #[test]
        fn larger_blocks_never_get_longer_prefixes(a in 1u64.., b in 1u64..) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(prefix_length(large) <= prefix_length(small));
        }

        #[test]
        fn prefix_block_fits_inside_value(value in 1u64..=(1u64 << 32)) {
            let length = prefix_length(value).expect("non-zero");
            let block = 1u64 << (32 - u32::from(length));
            prop_assert!(block <= value);
            prop_assert!(value < block * 2);
        }
    }
}
