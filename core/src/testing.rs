//! Small vendable types for the unit tests of this crate.
//!
//! `Leaf -> Middle -> Root` is a three-level chain declared through
//! `declare_bases`; `Standalone` is linked to `Root` only by tests that call
//! `declare_base_link`; `Solo` has no bases. `Diamond` reaches `Root`
//! twice, through `Middle` and through `Twin`. All of them share the concrete
//! `Probe` mock so upcasting is the identity.

use std::sync::Arc;

use crate::vendable::{Bases, Inherits, Vendable};

/// A hand-written mock: a tag to tell instances apart, zero for defaults
#[derive(Debug, Default)]
pub(crate) struct Probe {
    pub(crate) tag: u32,
}

impl Probe {
    pub(crate) fn answer(&self) -> u32 {
        self.tag * 2
    }
}

pub(crate) fn probe(tag: u32) -> Arc<Probe> {
    Arc::new(Probe { tag })
}

macro_rules! probe_vendable {
    ($name:ident $(=> $($base:ident),+)?) => {
        pub(crate) struct $name;

        impl Vendable for $name {
            type Mock = Probe;

            fn nice_mock() -> Arc<Probe> {
                Arc::new(Probe::default())
            }

            #[allow(unused_variables)]
            fn declare_bases(bases: &mut Bases<Self>) {
                $($(bases.link::<$base>();)+)?
            }
        }
    };
}

probe_vendable!(Root);
probe_vendable!(Middle => Root);
probe_vendable!(Leaf => Middle);
probe_vendable!(Solo);
probe_vendable!(Standalone);
probe_vendable!(Twin => Root);
probe_vendable!(Diamond => Middle, Twin);

macro_rules! probe_inherits {
    ($($derived:ident => $base:ident),* $(,)?) => {
        $(
            impl Inherits<$base> for $derived {
                fn upcast(mock: Arc<Probe>) -> Arc<Probe> {
                    mock
                }
            }
        )*
    };
}

probe_inherits!(
    Middle => Root,
    Leaf => Middle,
    Standalone => Root,
    Twin => Root,
    Diamond => Middle,
    Diamond => Twin,
);
