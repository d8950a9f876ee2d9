/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug, Clone)]
pub enum RandomCommand {
    I8(i8),
    I16(i16, ByteOrder),
    I32(i32, ByteOrder),
    I64(i64, ByteOrder),
    F32(u32, ByteOrder),
    F64(u64, ByteOrder),
    Nat8(u8),
    Nat16(u16, ByteOrder),
    Utf(String),
    Skip(u8),
    Peek,
}

pub fn harness(data: FuzzCase) {
    let mut writer = ByteWriter::to_vec();
    let mut written = vec![];
    for command in data.commands {
        let success = match &command {
            RandomCommand::I8(value) => writer.write_i8(*value).is_ok(),
            RandomCommand::I16(value, order) => writer.write_i16_in(*order, *value).is_ok(),
            RandomCommand::I32(value, order) => writer.write_i32_in(*order, *value).is_ok(),
            RandomCommand::I64(value, order) => writer.write_i64_in(*order, *value).is_ok(),
            RandomCommand::F32(bits, order) => {
                writer.write_f32_in(*order, f32::from_bits(*bits)).is_ok()
            }
            RandomCommand::F64(bits, order) => {
                writer.write_f64_in(*order, f64::from_bits(*bits)).is_ok()
            }
            RandomCommand::Nat8(value) => writer.write_nat8(*value as Nat8).is_ok(),
            RandomCommand::Nat16(value, order) => {
                writer.write_nat16_in(*order, *value as Nat16).is_ok()
            }
            RandomCommand::Utf(text) => {
                let fits = crate::utils::mutf8::encoded_len(text) <= u16::MAX as usize;
                assert_eq!(writer.write_utf(text).is_ok(), fits);
                fits
            }
            RandomCommand::Skip(n) => writer.write_bytes(&vec![0; *n as usize]).is_ok(),
            RandomCommand::Peek => true,
        };
        if success {
            written.push(command);
        }
    }
    let data = writer.into_inner().into_inner();

    let mut reader = ByteReader::from_bytes(&data);
    for command in written {
        match command {
            RandomCommand::I8(value) => assert_eq!(reader.read_i8().unwrap(), value),
            RandomCommand::I16(value, order) => {
                assert_eq!(reader.read_i16_in(order).unwrap(), value)
            }
            RandomCommand::I32(value, order) => {
                assert_eq!(reader.read_i32_in(order).unwrap(), value)
            }
            RandomCommand::I64(value, order) => {
                assert_eq!(reader.read_i64_in(order).unwrap(), value)
            }
            RandomCommand::F32(bits, order) => {
                assert_eq!(reader.read_f32_in(order).unwrap().to_bits(), bits)
            }
            RandomCommand::F64(bits, order) => {
                assert_eq!(reader.read_f64_in(order).unwrap().to_bits(), bits)
            }
            RandomCommand::Nat8(value) => assert_eq!(reader.read_nat8().unwrap(), value as Nat8),
            RandomCommand::Nat16(value, order) => {
                assert_eq!(reader.read_nat16_in(order).unwrap(), value as Nat16)
            }
            RandomCommand::Utf(text) => assert_eq!(reader.read_utf().unwrap(), text),
            RandomCommand::Skip(n) => assert_eq!(reader.skip_exact(n as u64).unwrap(), n as u64),
            RandomCommand::Peek => {
                let position = reader.position();
                let _ = reader.scoped(8, |reader| reader.read_i64());
                assert_eq!(reader.position(), position);
                assert!(!reader.is_marked());
            }
        }
    }
    assert_eq!(reader.position(), data.len() as u64);
    assert!(reader.read_i8().is_err());
}
