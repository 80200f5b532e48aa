//! Mock I2C implementation for testing

extern crate std;

use core::future::pending;
use embedded_hal_async::i2c::{
    Error, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress,
};
use std::vec::Vec;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write { addr: u8, data: Vec<u8> },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockI2cError(pub ErrorKind);

impl Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Mock I2C bus
///
/// Records all transactions and answers register reads from a register
/// map. Can be told to NACK everything or to never complete.
#[derive(Debug, Default)]
pub struct MockI2c {
    transactions: Vec<I2cTransaction>,
    registers: Vec<(u8, u8, Vec<u8>)>,
    nack: bool,
    stalled: bool,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set data returned when `register` of `addr` is read
    pub fn set_register(&mut self, addr: u8, register: u8, data: &[u8]) {
        self.registers.retain(|(a, r, _)| !(*a == addr && *r == register));
        self.registers.push((addr, register, data.to_vec()));
    }

    pub fn set_nack(&mut self, nack: bool) {
        self.nack = nack;
    }

    /// Make every transaction hang forever
    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<I2cTransaction> {
        self.transactions.clone()
    }

    fn register_data(&self, addr: u8, register: u8) -> Option<&[u8]> {
        self.registers
            .iter()
            .find(|(a, r, _)| *a == addr && *r == register)
            .map(|(_, _, data)| data.as_slice())
    }
}

impl ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl I2c<SevenBitAddress> for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.stalled {
            pending::<()>().await;
        }

        let mut write_data: Option<Vec<u8>> = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(data) => {
                    write_data = Some(data.to_vec());
                }
                Operation::Read(buffer) => {
                    buffer.fill(0);
                    let register = write_data.as_ref().and_then(|w| w.first().copied());
                    if let Some(data) = register.and_then(|r| self.register_data(address, r)) {
                        let n = data.len().min(buffer.len());
                        buffer[..n].copy_from_slice(&data[..n]);
                    }
                }
            }
        }

        let record = match (operations.len(), write_data) {
            (1, Some(data)) => I2cTransaction::Write {
                addr: address,
                data,
            },
            (_, Some(write_data)) => I2cTransaction::WriteRead {
                addr: address,
                write_data,
                read_len: operations
                    .iter()
                    .map(|op| match op {
                        Operation::Read(buffer) => buffer.len(),
                        Operation::Write(_) => 0,
                    })
                    .sum(),
            },
            (_, None) => I2cTransaction::Read {
                addr: address,
                len: operations
                    .iter()
                    .map(|op| match op {
                        Operation::Read(buffer) => buffer.len(),
                        Operation::Write(_) => 0,
                    })
                    .sum(),
            },
        };
        self.transactions.push(record);

        if self.nack {
            return Err(MockI2cError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }
        Ok(())
    }
}
