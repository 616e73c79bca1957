use packer::{CodecCache, Decoder, Encoder, Error, Pack, marshal, size_of, unmarshal};
// dependencies of the library and its unit tests
use log as _;
use proptest as _;
use serde as _;
use thiserror as _;
use toml as _;

fn round_trip<T>(value: &T) -> Vec<u8>
where
    T: Pack + Default + PartialEq + std::fmt::Debug,
{
    let buf = marshal(value).expect("serializing must work");
    assert_eq!(size_of(value).expect("sizing must work"), buf.len(), "size must match");

    let mut rev = T::default();
    unmarshal(&buf, &mut rev).expect("deserializing must work");
    assert_eq!(*value, rev, "serialization messed up data");
    buf
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Simple {
    pub n: i64,
    pub s: Vec<u8>,
}

#[test]
fn simple_record() {
    let buf = round_trip(&Simple {
        n: 1,
        s: b"x".to_vec(),
    });
    assert_eq!(buf, [0x01, 0x01, 0x78]);
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Base {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Embedding {
    pub before: i64,
    #[pack(flatten)]
    base: Base,
    pub after: Vec<u8>,
}

// the same visible fields, flattened by hand
#[derive(Debug, Default, PartialEq, Pack)]
pub struct HandFlattened {
    pub before: i64,
    pub id: i64,
    pub name: String,
    pub after: Vec<u8>,
}

#[test]
fn embedded_matches_hand_flattened() {
    let embedded = round_trip(&Embedding {
        before: -7,
        base: Base {
            id: 300,
            name: "base".to_owned(),
        },
        after: b"tail".to_vec(),
    });
    let flat = round_trip(&HandFlattened {
        before: -7,
        id: 300,
        name: "base".to_owned(),
        after: b"tail".to_vec(),
    });
    assert_eq!(embedded, flat, "flattening must not add framing");

    let mut cache = CodecCache::new();
    let codec = cache.get::<Embedding>().expect("supported");
    let paths: Vec<_> = codec.field_paths().collect();
    assert_eq!(paths, ["before", "base.id", "base.name", "after"]);
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct BoxEmbedding {
    pub before: i64,
    #[pack(flatten)]
    pub base: Box<Base>,
    pub after: Vec<u8>,
}

#[test]
fn boxed_embedding_is_flattened() {
    let boxed = round_trip(&BoxEmbedding {
        before: -7,
        base: Box::new(Base {
            id: 300,
            name: "base".to_owned(),
        }),
        after: b"tail".to_vec(),
    });
    let flat = round_trip(&HandFlattened {
        before: -7,
        id: 300,
        name: "base".to_owned(),
        after: b"tail".to_vec(),
    });
    assert_eq!(boxed, flat, "flattening through a box must not add framing");

    let mut cache = CodecCache::new();
    let codec = cache.get::<BoxEmbedding>().expect("supported");
    let paths: Vec<_> = codec.field_paths().collect();
    assert_eq!(paths, ["before", "base.id", "base.name", "after"]);
    assert_eq!(codec.len(), 4);
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Level3 {
    pub v: i64,
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Level2 {
    #[pack(flatten)]
    pub inner: Level3,
    pub w: i64,
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Level1 {
    pub head: i64,
    #[pack(flatten)]
    pub inner: Level2,
    pub nested: Level3,
}

#[test]
fn deep_flattening_is_depth_first() {
    let value = Level1 {
        head: 1,
        inner: Level2 {
            inner: Level3 { v: 2 },
            w: 3,
        },
        nested: Level3 { v: 4 },
    };
    assert_eq!(round_trip(&value), [1, 2, 3, 4]);

    let mut cache = CodecCache::new();
    let codec = cache.get::<Level1>().expect("supported");
    let paths: Vec<_> = codec.field_paths().collect();
    assert_eq!(paths, ["head", "inner.inner.v", "inner.w", "nested"]);
    assert_eq!(cache.len(), 4, "i64 and three records");
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Visibility {
    pub shown: i64,
    hidden: i64,
    pub(crate) restricted: Vec<u8>,
    #[pack(skip)]
    pub skipped: i64,
    pub last: i64,
}

#[test]
fn private_fields_are_not_packed() {
    let value = Visibility {
        shown: 1,
        hidden: 2,
        restricted: b"r".to_vec(),
        skipped: 3,
        last: 4,
    };
    let buf = marshal(&value).expect("encodable");
    assert_eq!(buf, [1, 4]);

    let mut dst = Visibility {
        shown: 10,
        hidden: 20,
        restricted: b"keep".to_vec(),
        skipped: 30,
        last: 40,
    };
    unmarshal(&buf, &mut dst).expect("valid data");
    assert_eq!(
        dst,
        Visibility {
            shown: 1,
            hidden: 20,
            restricted: b"keep".to_vec(),
            skipped: 30,
            last: 4,
        },
        "only packed fields may be overwritten"
    );
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct WithRefs {
    pub boxed: Box<Simple>,
    pub optional: Option<Box<Simple>>,
    pub n: i64,
}

#[test]
fn by_reference_matches_by_value() {
    let simple = Simple {
        n: 300,
        s: b"AB".to_vec(),
    };
    let by_value = marshal(&simple).expect("encodable");
    let by_box = marshal(&Box::new(Simple {
        n: 300,
        s: b"AB".to_vec(),
    }))
    .expect("encodable");
    assert_eq!(by_value, by_box);

    let refs = WithRefs {
        boxed: Box::new(Simple {
            n: 300,
            s: b"AB".to_vec(),
        }),
        optional: Some(Box::new(Simple {
            n: 300,
            s: b"AB".to_vec(),
        })),
        n: 5,
    };
    let mut expected = by_value.clone();
    expected.extend_from_slice(&by_value);
    expected.push(5);
    assert_eq!(round_trip(&refs), expected);
}

#[test]
fn unset_reference_is_allocated() {
    let src = WithRefs {
        optional: Some(Box::new(Simple {
            n: 9,
            s: b"z".to_vec(),
        })),
        ..WithRefs::default()
    };
    let buf = marshal(&src).expect("encodable");

    let mut dst = WithRefs::default();
    assert!(dst.optional.is_none(), "starts unset");
    unmarshal(&buf, &mut dst).expect("valid data");
    assert_eq!(
        dst.optional.as_deref(),
        Some(&Simple {
            n: 9,
            s: b"z".to_vec(),
        })
    );
}

#[test]
fn unset_reference_writes_zero_value() {
    let with_none = marshal(&WithRefs::default()).expect("encodable");
    let with_default = marshal(&WithRefs {
        optional: Some(Box::default()),
        ..WithRefs::default()
    })
    .expect("encodable");
    assert_eq!(with_none, with_default);
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Pair(pub i64, i64, pub Vec<u8>);

#[test]
fn tuple_struct() {
    let buf = marshal(&Pair(1, 2, b"c".to_vec())).expect("encodable");
    assert_eq!(buf, [1, 1, b'c']);

    let mut cache = CodecCache::new();
    let codec = cache.get::<Pair>().expect("supported");
    let paths: Vec<_> = codec.field_paths().collect();
    assert_eq!(paths, ["0", "2"]);
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Empty;

#[derive(Debug, Default, PartialEq, Pack)]
pub struct OnlyPrivate {
    secret: i64,
}

#[test]
fn records_without_packed_fields() {
    assert!(round_trip(&Empty).is_empty(), "nothing to encode");
    assert!(
        round_trip(&OnlyPrivate { secret: 0 }).is_empty(),
        "nothing to encode"
    );

    let mut cache = CodecCache::new();
    assert!(cache.get::<Empty>().expect("supported").is_empty());
    assert!(cache.get::<OnlyPrivate>().expect("supported").is_empty());
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Wrapper<T> {
    pub value: T,
    pub count: i64,
}

#[test]
fn generic_record() {
    let bytes = round_trip(&Wrapper {
        value: b"AB".to_vec(),
        count: 0,
    });
    assert_eq!(bytes, [0x02, 0x41, 0x42, 0x00]);

    let nested = round_trip(&Wrapper {
        value: Simple {
            n: 1,
            s: b"x".to_vec(),
        },
        count: 300,
    });
    assert_eq!(nested, [0x01, 0x01, 0x78, 0xAC, 0x02]);
}

#[derive(Debug, Default, PartialEq, Pack)]
pub struct Tree {
    pub label: String,
    pub left: Option<Box<Tree>>,
}

#[test]
fn recursive_record_is_rejected() {
    let err = marshal(&Tree::default()).expect_err("contains itself");
    assert!(matches!(err, Error::RecursiveType(_)), "got {err:?}");

    let mut dst = Tree::default();
    let err = unmarshal(&[0x00], &mut dst).expect_err("contains itself");
    assert!(matches!(err, Error::RecursiveType(_)), "got {err:?}");
}

#[test]
fn stream_reuses_codecs_and_buffers() {
    let mut enc = Encoder::new(Vec::new());
    for n in 0..3 {
        enc.encode(&Simple {
            n,
            s: vec![b'a'; 40],
        })
        .expect("vec write can't fail");
    }
    assert_eq!(enc.cache().len(), 3, "record, i64, and bytes");

    let buf = enc.into_inner();
    let mut dec = Decoder::new(buf.as_slice());
    let mut dst = Simple::default();

    dec.decode(&mut dst).expect("valid data");
    let ptr = dst.s.as_ptr();
    for n in 1..3 {
        dec.decode(&mut dst).expect("valid data");
        assert_eq!(dst.n, n);
        assert_eq!(dst.s.as_ptr(), ptr, "must reuse the byte buffer");
    }

    assert!(dec.get_ref().is_empty(), "must consume the whole stream");
    let err = dec.decode(&mut dst).expect_err("stream is exhausted");
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
}

#[test]
fn failed_decode_keeps_prior_fields() {
    let buf = marshal(&Simple {
        n: 300,
        s: b"payload".to_vec(),
    })
    .expect("encodable");

    let mut dst = Simple {
        n: 1,
        s: b"old".to_vec(),
    };
    let err = unmarshal(&buf[..2], &mut dst).expect_err("input ends early");
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
    assert_eq!(dst.n, 300, "decoded before the failure");
    assert_eq!(dst.s, b"old", "not reached before the failure");
}
