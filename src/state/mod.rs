pub(crate) mod persisted;
