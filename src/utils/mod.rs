/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Helpers for bit streams.

The [`finalizer`] module describes the layout of the end-of-stream marker
written by a [`BitPacker`](crate::impls::BitPacker).

[`CountBitReader`] and [`CountBitWriter`] keep track of the number
of bits read or written to a [`BitRead`](crate::traits::BitRead)
and [`BitWrite`](crate::traits::BitWrite), respectively,
optionally printing on standard error the operations performed on the stream.

*/

pub mod finalizer;
pub use finalizer::*;

#[cfg(feature = "std")]
mod count;
#[cfg(feature = "std")]
pub use count::*;
