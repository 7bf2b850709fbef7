use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

/// Lifecycle of one partition id within a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionState {
    Loading,
    Loaded,
    Unloading,
}

/// How a partition is being loaded: replacing everything, or alongside what
/// is already loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadMode {
    Reset,
    Add,
}

/// The two changes a `PartitionChange` frame can announce
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeMode {
    Add,
    Remove,
}

/// Every transition a peer can acknowledge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionMode {
    Reset,
    Add,
    Remove,
}

impl From<LoadMode> for PartitionMode {
    fn from(mode: LoadMode) -> Self {
        match mode {
            LoadMode::Reset => PartitionMode::Reset,
            LoadMode::Add => PartitionMode::Add,
        }
    }
}

impl From<ChangeMode> for PartitionMode {
    fn from(mode: ChangeMode) -> Self {
        match mode {
            ChangeMode::Add => PartitionMode::Add,
            ChangeMode::Remove => PartitionMode::Remove,
        }
    }
}

impl Serde for LoadMode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let is_reset = *self == LoadMode::Reset;
        is_reset.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(LoadMode::Reset)
        } else {
            Ok(LoadMode::Add)
        }
    }

    fn bit_length(&self) -> u32 {
        (*self == LoadMode::Reset).bit_length()
    }
}

impl Serde for ChangeMode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let is_remove = *self == ChangeMode::Remove;
        is_remove.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(ChangeMode::Remove)
        } else {
            Ok(ChangeMode::Add)
        }
    }

    fn bit_length(&self) -> u32 {
        (*self == ChangeMode::Remove).bit_length()
    }
}

impl Serde for PartitionMode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let index = match self {
            PartitionMode::Reset => 0,
            PartitionMode::Add => 1,
            PartitionMode::Remove => 2,
        };
        UnsignedInteger::<2>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(PartitionMode::Reset),
            1 => Ok(PartitionMode::Add),
            2 => Ok(PartitionMode::Remove),
            // a peer sending index 3 is malformed, never trust it
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        <UnsignedInteger<2> as ConstBitLength>::const_bit_length()
    }
}
