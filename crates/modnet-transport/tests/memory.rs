//! Integration tests for the in-memory transport.

#[cfg(feature = "memory")]
mod memory {
    use modnet_transport::{MemoryTransport, PeerId, Route, Transport, TransportError};

    #[test]
    fn test_memory_transport_records_packets_in_order() {
        let mut transport = MemoryTransport::new();
        transport.send(&[1, 2, 3], Route::all()).unwrap();
        transport
            .send(&[4], Route::all_except(PeerId(3)))
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].bytes, vec![1, 2, 3]);
        assert_eq!(sent[0].route, Route::all());
        assert_eq!(sent[1].bytes, vec![4]);
        assert_eq!(sent[1].route.except, Some(PeerId(3)));
    }

    #[test]
    fn test_memory_transport_drain_empties_queue() {
        let mut transport = MemoryTransport::new();
        transport.send(&[9], Route::to(PeerId(1))).unwrap();

        let drained = transport.drain();
        assert_eq!(drained.len(), 1);
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_memory_transport_closed_rejects_sends() {
        let mut transport = MemoryTransport::new();
        transport.close();

        let err = transport.send(&[1], Route::all()).unwrap_err();
        assert!(matches!(err, TransportError::Closed(_)));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_memory_transport_enforces_size_limit() {
        let mut transport = MemoryTransport::with_max_packet_size(4);
        transport.send(&[0; 4], Route::all()).unwrap();

        let err = transport.send(&[0; 5], Route::all()).unwrap_err();
        assert!(matches!(
            err,
            TransportError::TooLarge { size: 5, limit: 4 }
        ));
    }

    #[test]
    fn test_transport_through_mutable_reference() {
        // Hosts often lend their transport to modnet for one call.
        fn push(mut t: impl Transport) {
            t.send(&[7], Route::all()).unwrap();
        }

        let mut transport = MemoryTransport::new();
        push(&mut transport);
        assert_eq!(transport.sent().len(), 1);
    }
}
