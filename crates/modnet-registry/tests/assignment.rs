//! Integration tests for cross-peer id assignment.
//!
//! Two registries stand in for two independent peers. Nothing is shared
//! between them except the list of modules, exactly like real peers.

use modnet_protocol::{
    MessageId, ModuleId, PacketReader, PacketWriter, ProtocolError, SenderInfo, Width,
};
use modnet_registry::{MessageKind, MessageRegistry, ModuleManifest, NetMessage, SyncPolicy};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

// =========================================================================
// Message types
// =========================================================================

/// A family of distinct message types, one per `<H, T, O>` digit triple.
#[derive(Default)]
struct Numbered<const H: u8, const T: u8, const O: u8>;

impl<const H: u8, const T: u8, const O: u8> NetMessage for Numbered<H, T, O> {
    fn serialize(&self, _: &mut PacketWriter) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn deserialize(
        &mut self,
        _: &mut PacketReader<'_>,
        _: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn receive(&self, _: &SenderInfo) -> bool {
        true
    }
}

macro_rules! hundreds {
    ($kinds:ident; $($h:literal)*) => {
        $( tens!($kinds; $h; 0 1 2 3 4 5 6 7 8 9); )*
    };
}

macro_rules! tens {
    ($kinds:ident; $h:literal; $($t:literal)*) => {
        $( ones!($kinds; $h; $t; 0 1 2 3 4 5 6 7 8 9); )*
    };
}

macro_rules! ones {
    ($kinds:ident; $h:literal; $t:literal; $($o:literal)*) => {
        $(
            $kinds.push(MessageKind::named::<Numbered<$h, $t, $o>>(
                concat!("numbered.", $h, $t, $o),
            ));
        )*
    };
}

/// 300 kinds named `numbered.000` through `numbered.299`.
fn three_hundred_kinds() -> Vec<MessageKind> {
    let mut kinds = Vec::with_capacity(300);
    hundreds!(kinds; 0 1 2);
    kinds
}

fn module(id: u16, name: &str, kinds: Vec<MessageKind>) -> ModuleManifest {
    let mut manifest = ModuleManifest::new(ModuleId(id), name, SyncPolicy::Both);
    manifest.messages = kinds;
    manifest
}

fn table(registry: &MessageRegistry) -> Vec<(&'static str, MessageId)> {
    registry.iter().map(|d| (d.name(), d.id())).collect()
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn test_two_peers_agree_regardless_of_enumeration_order() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut first = three_hundred_kinds();
    let mut second = three_hundred_kinds();
    first.shuffle(&mut rng);
    second.shuffle(&mut rng);

    let mut peer_a = MessageRegistry::new();
    let mut peer_b = MessageRegistry::new();
    peer_a.register(&module(3, "bulk", first)).unwrap();
    peer_b.register(&module(3, "bulk", second)).unwrap();

    assert_eq!(table(&peer_a), table(&peer_b));
}

#[test]
fn test_bulk_load_agrees_regardless_of_module_order() {
    let kinds = three_hundred_kinds();
    let modules = vec![
        module(1, "items", kinds[..100].to_vec()),
        module(2, "combat", kinds[100..200].to_vec()),
        module(3, "weather", kinds[200..].to_vec()),
    ];
    let mut reversed = modules.clone();
    reversed.reverse();

    let mut peer_a = MessageRegistry::new();
    let mut peer_b = MessageRegistry::new();
    peer_a.register_loaded(&modules).unwrap();
    peer_b.register_loaded(&reversed).unwrap();

    assert_eq!(table(&peer_a), table(&peer_b));
    // "combat" sorts first, so its types take ids 0..100.
    assert_eq!(peer_a.id_of::<Numbered<1, 0, 0>>(), Some(MessageId(0)));
}

#[test]
fn test_three_hundred_types_need_wide_ids() {
    let mut registry = MessageRegistry::new();
    registry.register(&module(1, "bulk", three_hundred_kinds())).unwrap();

    assert_eq!(registry.len(), 300);
    assert_eq!(Width::for_count(registry.len()), Width::Wide);
    assert_eq!(registry.id_of::<Numbered<2, 5, 5>>(), Some(MessageId(255)));
    assert_eq!(registry.id_of::<Numbered<2, 5, 6>>(), Some(MessageId(256)));
    assert_eq!(registry.descriptor(MessageId(299)).unwrap().name(), "numbered.299");
}

#[test]
fn test_clear_then_reregister_reproduces_table() {
    let modules = vec![
        module(1, "items", three_hundred_kinds()[..10].to_vec()),
        module(2, "combat", three_hundred_kinds()[10..20].to_vec()),
    ];

    let mut registry = MessageRegistry::new();
    registry.register_loaded(&modules).unwrap();
    let before = table(&registry);

    registry.clear();
    registry.register_loaded(&modules).unwrap();
    assert_eq!(table(&registry), before);
}

#[test]
fn test_repeated_registration_leaves_table_unchanged() {
    let manifest = module(1, "items", three_hundred_kinds()[..5].to_vec());

    let mut registry = MessageRegistry::new();
    registry.register(&manifest).unwrap();
    let before = table(&registry);

    assert_eq!(registry.register(&manifest).unwrap(), 0);
    assert_eq!(registry.register_loaded(&[manifest]).unwrap(), 0);
    assert_eq!(table(&registry), before);
    assert_eq!(registry.len(), 5);
}
