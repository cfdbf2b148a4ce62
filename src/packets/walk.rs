//! A small helper shared by every container that holds a back-to-back sequence of sub-TLVs
//! (action lists, instruction lists, bucket lists, queue properties, meter bands, table feature
//! properties...).
//!
//! It mirrors the walk that [`crate::oxm::FlowMatch`] already does over OXM fields and that
//! [`crate::hello::ElementsIterator`] does over Hello elements: stop cleanly, without raising an
//! error, as soon as an entry doesn't fit in what's left of the buffer.
use crate::{Error, Repr, Result};

pub fn walk<T: Repr>(buffer: &[u8]) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut offset = 0;
    while offset < buffer.len() {
        match T::parse(&buffer[offset..]) {
            Ok(item) => {
                let len = item.buffer_len();
                if len == 0 {
                    break;
                }
                offset += len;
                items.push(item);
            }
            Err(Error::Truncated) | Err(Error::Exhausted) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(items)
}

pub fn emit_all<T: Repr>(items: &[T], buffer: &mut [u8]) -> Result<usize> {
    let mut offset = 0;
    for item in items {
        let len = item.buffer_len();
        item.emit(&mut buffer[offset..offset + len])?;
        offset += len;
    }
    Ok(offset)
}

pub fn total_len<T: Repr>(items: &[T]) -> usize {
    items.iter().fold(0, |acc, item| acc + item.buffer_len())
}
