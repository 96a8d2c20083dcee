#![no_main]

// Builds a pipeline from arbitrary invertible stages and checks that decoding
// the encoded buffer returns the input.

use libfuzzer_sys::{arbitrary, fuzz_target};
use pixel_mask_transform_core::{ByteBuffer, Pipeline, TransformStage};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub enum Stage {
    XorKey(u8),
    XorBuffer(u8),
    RotateRight(u32),
    RotateLeft(u32),
}

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub width: u8,
    pub height: u8,
    pub salt: u8,
    pub stages: Vec<Stage>,
}

fn pattern(width: u32, height: u32, salt: u8) -> ByteBuffer {
    let len = width as usize * height as usize * 3;
    let bytes = (0..len).map(|x| (x as u8).wrapping_mul(31) ^ salt).collect();
    ByteBuffer::new(width, height, bytes).unwrap()
}

fuzz_target!(|input: Input| {
    let width = u32::from(input.width % 32) + 1;
    let height = u32::from(input.height % 32) + 1;
    let original = pattern(width, height, input.salt);

    let pipeline: Pipeline = input
        .stages
        .iter()
        .map(|stage| {
            let stage = match *stage {
                Stage::XorKey(key) => TransformStage::XorKey(key),
                Stage::XorBuffer(salt) => TransformStage::XorBuffer(pattern(width, height, salt)),
                Stage::RotateRight(n) => TransformStage::RotateRight(n),
                Stage::RotateLeft(n) => TransformStage::RotateLeft(n),
            };
            stage.into()
        })
        .collect();

    let encoded = pipeline.encode(original.clone()).unwrap();
    let decoded = pipeline.decode(encoded).unwrap();
    assert_eq!(decoded, original);
});
