#![no_main]

// Applies arbitrary mask records to a small buffer. Records that do not fit
// must be rejected without modifying the buffer; records that fit must be
// undone by the reverse correction.

use libfuzzer_sys::{arbitrary, fuzz_target};
use pixel_mask_transform_core::mask::{apply_correction, reverse_correction};
use pixel_mask_transform_core::{ByteBuffer, MaskRecord};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub seed: u16,
    pub pixels: u8,
    pub mask_pixels: u8,
    pub salt: u8,
}

fuzz_target!(|input: Input| {
    let image = ByteBuffer::new(8, 8, (0..192).map(|x| x as u8 ^ input.salt).collect()).unwrap();
    let mask_pixels = u32::from(input.mask_pixels) + 1;
    let mask = ByteBuffer::new(mask_pixels, 1, vec![0x5A; mask_pixels as usize * 3]).unwrap();

    let seed = usize::from(input.seed);
    let pixels = usize::from(input.pixels);
    let record = MaskRecord::capture(&image, seed, pixels)
        .unwrap_or_else(|_| MaskRecord::new(seed, vec![[1, 2, 3]; pixels]));

    let mut target = image.clone();
    match apply_correction(&mut target, &mask, &record) {
        Ok(()) => {
            reverse_correction(&mut target, &mask, &record).unwrap();
            assert_eq!(target, image);
        }
        Err(_) => assert_eq!(target, image),
    }
});
