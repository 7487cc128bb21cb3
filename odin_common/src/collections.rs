/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::collections::VecDeque;
use serde::{Serialize,Serializer};

/// a VecDeque that is used as a ringbuffer with bounded size, i.e. if the capacity is reached
/// the oldest element is dropped before a new one is added.
/// Note that we have to keep the capacity bound ourselves since `VecDeque::capacity()` can be
/// larger than what was requested in `with_capacity(..)`, hence the explicit `max_len` arguments
pub trait RingDeque<T> {
    fn new (max_len: usize)->Self;

    /// make sure there is space for an additional element, returning the dropped element (if any)
    fn ensure_ringbuffer_space (&mut self, max_len: usize)->Option<T>;

    /// push a new element to the end, dropping the oldest one if we would exceed max_len
    fn push_to_ringbuffer (&mut self, t: T, max_len: usize)->Option<T>;

    /// the last (most recent) n elements in chronological order
    fn latest (&self, n: usize)->Vec<&T>;
}

impl<T> RingDeque<T> for VecDeque<T> {
    fn new (max_len: usize)->Self {
        VecDeque::with_capacity(max_len)
    }

    #[inline]
    fn ensure_ringbuffer_space (&mut self, max_len: usize)->Option<T> {
        if max_len > 0 && self.len() >= max_len {
            self.pop_front()
        } else {
            None
        }
    }

    #[inline]
    fn push_to_ringbuffer (&mut self, t: T, max_len: usize)->Option<T> {
        if max_len == 0 { return Some(t) } // nothing is ever stored

        let dropped = self.ensure_ringbuffer_space( max_len);
        self.push_back(t);
        dropped
    }

    fn latest (&self, n: usize)->Vec<&T> {
        let skip = self.len().saturating_sub(n);
        self.iter().skip(skip).collect()
    }
}

/// a bounded, chronologically ordered log of entries
#[derive(Debug,Clone)]
pub struct BoundedLog<T> {
    max_len: usize,
    entries: VecDeque<T>
}

impl<T> BoundedLog<T> {
    pub fn new (max_len: usize)->Self {
        BoundedLog { max_len, entries: RingDeque::new(max_len) }
    }

    pub fn push (&mut self, t: T) {
        self.entries.push_to_ringbuffer( t, self.max_len);
    }

    pub fn len (&self)->usize { self.entries.len() }
    pub fn is_empty (&self)->bool { self.entries.is_empty() }
    pub fn max_len (&self)->usize { self.max_len }

    pub fn iter (&self)->impl Iterator<Item=&T> { self.entries.iter() }
    pub fn last (&self)->Option<&T> { self.entries.back() }

    pub fn latest (&self, n: usize)->Vec<&T> { self.entries.latest(n) }

    pub fn clear (&mut self) { self.entries.clear() }
}

// logs are serialized as plain sequences (oldest first)
impl<T> Serialize for BoundedLog<T> where T: Serialize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.collect_seq( self.entries.iter())
    }
}
