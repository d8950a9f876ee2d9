/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    fields: Vec<Field>,
    order: ByteOrder,
    scope: OrderScope,
    repeat: Option<(Atom, Vec<u64>)>,
}

#[derive(Arbitrary, Debug)]
pub struct Field {
    atom: Atom,
    raw: u64,
    text: String,
}

/// Build a value of the kind of `atom` from raw material; NaNs are replaced
/// so that values can be compared.
fn value_of(atom: Atom, raw: u64, text: &str) -> Value {
    match atom {
        Atom::Int8 => Value::Int8(raw as i8),
        Atom::Int16 => Value::Int16(raw as i16),
        Atom::Char16 => Value::Char16(raw as u16),
        Atom::Int32 => Value::Int32(raw as i32),
        Atom::Int64 => Value::Int64(raw as i64),
        Atom::Rat32 => Value::Rat32(Some(f32::from_bits(raw as u32)).filter(|x| !x.is_nan()).unwrap_or(0.0)),
        Atom::Rat64 => Value::Rat64(Some(f64::from_bits(raw)).filter(|x| !x.is_nan()).unwrap_or(0.0)),
        Atom::Nat8 => Value::Nat8(raw as u8 as Nat8),
        Atom::Nat16 => Value::Nat16(raw as u16 as Nat16),
        Atom::Utf => Value::Text(text.chars().take(1024).collect()),
    }
}

pub fn harness(data: FuzzCase) {
    let mut children: Vec<Struct> = data.fields.iter().map(|field| field.atom.into()).collect();
    let mut slots: Vec<Value> = data
        .fields
        .iter()
        .map(|field| value_of(field.atom, field.raw, &field.text))
        .collect();
    if let Some((atom, raws)) = &data.repeat {
        children.push(Struct::counted_array(Atom::Int32, *atom));
        let items: Vec<Value> = raws.iter().map(|raw| value_of(*atom, *raw, "")).collect();
        slots.push(Composite::from(vec![Value::Int32(items.len() as i32), Value::Array(items)]).into());
    }
    let layout = Struct::with_order(data.order, data.scope, Struct::sequence(children));
    let value = Value::Composite(slots.into());

    let mut writer = ByteWriter::to_vec();
    layout.write(&mut writer, &value).unwrap();
    let expected_order = match data.scope {
        OrderScope::Leak => data.order,
        OrderScope::Restore => ByteOrder::CANONICAL,
    };
    assert_eq!(writer.byte_order(), expected_order);
    let bytes = writer.into_inner().into_inner();
    if let Some(size) = layout.size() {
        assert_eq!(size, bytes.len());
    }

    let mut reader = ByteReader::from_bytes(&bytes);
    assert_eq!(layout.read(&mut reader).unwrap(), value);
    assert_eq!(reader.position(), bytes.len() as u64);
}
