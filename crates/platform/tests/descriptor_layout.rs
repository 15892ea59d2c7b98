//! Architecture tests: link descriptor word layout.
//! The DMA engine reads these bits directly, so the positions are fixed.

// Test files legitimately use arithmetic for verification; allow at file level.
#![allow(clippy::arithmetic_side_effects)]

use platform::dma::{LinkDescriptor, Owner, MAX_DESCRIPTOR_BYTES};

// Test 1: a fresh descriptor is all zero and CPU-owned
#[test]
fn new_descriptor_is_empty() {
    let d = LinkDescriptor::new();
    assert_eq!(d.flags(), 0);
    assert_eq!(d.owner(), Owner::Cpu);
    assert!(d.buffer().is_null());
    assert!(d.next().is_null());
}

// Test 2: blocksize occupies bits 0..=11
#[test]
fn blocksize_in_low_twelve_bits() {
    let mut d = LinkDescriptor::new();
    d.set_size(256);
    assert_eq!(d.flags(), 256);
}

// Test 3: datalen occupies bits 12..=23
#[test]
fn datalen_in_middle_twelve_bits() {
    let mut d = LinkDescriptor::new();
    d.set_length(256);
    assert_eq!(d.flags(), 256 << 12);
}

// Test 4: flag bits
#[test]
fn sub_sof_eof_owner_in_top_bits() {
    let mut d = LinkDescriptor::new();
    d.set_sub_sof(true);
    assert_eq!(d.flags(), 1 << 29);
    d.set_sub_sof(false);
    d.set_eof(true);
    assert_eq!(d.flags(), 1 << 30);
    d.set_eof(false);
    d.set_owner(Owner::Dma);
    assert_eq!(d.flags(), 1 << 31);
}

// Test 5: a fully wired audio descriptor
#[test]
fn audio_buffer_descriptor_word() {
    let mut d = LinkDescriptor::new();
    d.set_size(256);
    d.set_length(256);
    d.set_eof(true);
    d.set_owner(Owner::Dma);
    assert_eq!(d.flags(), 0xC010_0100);
}

// Test 6: oversized lengths are truncated to the field, never spill over
#[test]
fn oversized_length_does_not_touch_flags() {
    let mut d = LinkDescriptor::new();
    d.set_length(0xFFFF);
    assert_eq!(d.length() as usize, MAX_DESCRIPTOR_BYTES);
    assert!(!d.is_eof());
    assert_eq!(d.owner(), Owner::Cpu);
}

// Test 7: flags, buffer and next each take one pointer-sized slot
#[test]
fn descriptor_is_three_words() {
    assert_eq!(
        core::mem::size_of::<LinkDescriptor>(),
        3 * core::mem::size_of::<usize>()
    );
    assert_eq!(core::mem::align_of::<LinkDescriptor>() % 4, 0);
}
