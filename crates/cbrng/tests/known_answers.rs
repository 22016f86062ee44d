use cbrng::{hardware_available, Aes2x64, Aes4x32, Ars2x64, Ars4x32, Backend};

fn backends() -> Vec<bool> {
    if hardware_available() {
        vec![false, true]
    } else {
        vec![false]
    }
}

#[test]
fn aes4x32_vectors() {
    let cases: [([u32; 4], [u32; 4], [u32; 4]); 4] = [
        ([0; 4], [0; 4], [0xd44be966, 0x3b2c8aef, 0x59fa4c88, 0x2e2b34ca]),
        (
            [0xffffffff; 4],
            [0xffffffff, 0xffffffff, 0, 0],
            [0x0f68399f, 0xcc680a67, 0x4cbd230d, 0x816d2e23],
        ),
        (
            [0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344],
            [0xa4093822, 0x299f31d0, 0x082efa98, 0xec4e6c89],
            [0xca693cbf, 0x134a4f64, 0x965e0cfd, 0x5217a28f],
        ),
        (
            [0x33221100, 0x77665544, 0xbbaa9988, 0xffeeddcc],
            [0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c],
            [0xd8e0c469, 0x30047b6a, 0x80b7cdd8, 0x5ac5b470],
        ),
    ];
    for hardware in backends() {
        for (ctr, key, expected) in cases {
            let mut g = Aes4x32::new(key);
            g.set_hardware_mode(hardware).unwrap();
            assert_eq!(g.generate(ctr), expected, "hardware={hardware} key={key:08x?}");
        }
    }
}

#[test]
fn aes2x64_vectors() {
    let cases: [([u64; 2], [u64; 2], [u64; 2]); 4] = [
        ([0; 2], [0; 2], [0x3b2c8aefd44be966, 0x2e2b34ca59fa4c88]),
        (
            [u64::MAX; 2],
            [u64::MAX, 0],
            [0xcc680a670f68399f, 0x816d2e234cbd230d],
        ),
        (
            [0x85a308d3243f6a88, 0x0370734413198a2e],
            [0x299f31d0a4093822, 0xec4e6c89082efa98],
            [0x134a4f64ca693cbf, 0x5217a28f965e0cfd],
        ),
        (
            [0x7766554433221100, 0xffeeddccbbaa9988],
            [0x0706050403020100, 0x0f0e0d0c0b0a0908],
            [0x30047b6ad8e0c469, 0x5ac5b47080b7cdd8],
        ),
    ];
    for hardware in backends() {
        for (ctr, key, expected) in cases {
            let mut g = Aes2x64::new(key);
            g.set_hardware_mode(hardware).unwrap();
            assert_eq!(g.generate(ctr), expected);
        }
    }
}

#[test]
fn ars4x32_vectors() {
    let cases: [([u32; 4], [u32; 4], [u32; 4]); 3] = [
        ([0; 4], [0; 4], [0x8d73ee19, 0x506401ef, 0x13c2dbe4, 0x0cbe9c0d]),
        (
            [0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344],
            [0xa4093822, 0x299f31d0, 0x082efa98, 0xec4e6c89],
            [0xa516e7d6, 0x8357ad74, 0x5b59b3ec, 0x8763fff3],
        ),
        (
            [0xffffffff; 4],
            [0xffffffff, 0xffffffff, 0, 0],
            [0xbb3743b1, 0x9f635551, 0xecbc87fc, 0xa19478a9],
        ),
    ];
    for hardware in backends() {
        for (ctr, key, expected) in cases {
            let mut g = Ars4x32::<10>::new(key);
            g.set_hardware_mode(hardware).unwrap();
            assert_eq!(g.generate(ctr), expected);
        }
    }
}

#[test]
fn ars2x64_vectors() {
    let cases: [([u64; 2], [u64; 2], [u64; 2]); 3] = [
        ([0; 2], [0; 2], [0x506401ef8d73ee19, 0x0cbe9c0d13c2dbe4]),
        (
            [0x85a308d3243f6a88, 0x0370734413198a2e],
            [0x299f31d0a4093822, 0xec4e6c89082efa98],
            [0x8357ad74a516e7d6, 0x8763fff35b59b3ec],
        ),
        (
            [u64::MAX; 2],
            [u64::MAX, 0],
            [0x9f635551bb3743b1, 0xa19478a9ecbc87fc],
        ),
    ];
    for hardware in backends() {
        for (ctr, key, expected) in cases {
            let mut g = Ars2x64::<10>::new(key);
            g.set_hardware_mode(hardware).unwrap();
            assert_eq!(g.generate(ctr), expected);
        }
    }
}

#[test]
fn fips_197_appendix_c1() {
    let key: [u8; 16] = core::array::from_fn(|i| i as u8);
    let plain: [u8; 16] = core::array::from_fn(|i| (i as u8) * 0x11);
    let g = Aes4x32::from_bytes(key);
    let out = cbrng::BlockFunction::generate_block(&g, &plain);
    assert_eq!(
        out,
        [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a
        ]
    );
    assert!(matches!(g.backend(), Backend::Software | Backend::Hardware));
}
