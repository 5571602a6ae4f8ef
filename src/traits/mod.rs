/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits for word streams and bit streams, and the [`Word`] trait describing
the words they move.

*/

mod bits;
pub use bits::*;

mod words;
pub use words::*;
