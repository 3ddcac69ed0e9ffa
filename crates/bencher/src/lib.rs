//! Test cases shared by the frame codec benchmarks.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    payload: TestPayload,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, payload: TestPayload) -> Self {
        Self { name, group, payload }
    }

    pub fn small(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Small, payload)
    }

    pub fn normal(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Normal, payload)
    }

    pub fn large(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Large, payload)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn payload(&self) -> &TestPayload {
        &self.payload
    }
}

/// Shape of the frame payload a benchmark runs against.
#[derive(Debug, Copy, Clone)]
pub struct TestPayload {
    len: usize,
    mask_key: Option<[u8; 4]>,
}

impl TestPayload {
    pub const fn new(len: usize, mask_key: Option<[u8; 4]>) -> Self {
        Self { len, mask_key }
    }

    /// A client frame: masked with a fixed key
    pub const fn masked(len: usize) -> Self {
        Self::new(len, Some([0x37, 0xfa, 0x21, 0x3d]))
    }

    /// A server frame: sent unmasked
    pub const fn unmasked(len: usize) -> Self {
        Self::new(len, None)
    }

    pub fn mask_key(&self) -> Option<[u8; 4]> {
        self.mask_key
    }

    /// Deterministic payload bytes of the configured length
    pub fn bytes(&self) -> Vec<u8> {
        (0..self.len).map(|i| (i % 251) as u8).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestGroup::Small => "small",
            TestGroup::Normal => "normal",
            TestGroup::Large => "large",
        }
    }
}
