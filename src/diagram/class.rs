use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    pub fields: Vec<String>,
    pub methods: Vec<String>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        ClassRecord {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }
}

/// Class records keyed by name, kept in discovery order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ClassDiagram {
    classes: Vec<ClassRecord>,
}

impl ClassDiagram {
    pub fn new() -> Self {
        ClassDiagram {
            classes: Vec::new(),
        }
    }

    /// Opens a record for `name` and returns its index.
    ///
    /// Redeclaring a known class resets its record but keeps its original
    /// position.
    pub fn open_class(&mut self, name: &str) -> usize {
        if let Some(idx) = self.classes.iter().position(|c| c.name == name) {
            self.classes[idx] = ClassRecord::new(name);
            return idx;
        }
        self.classes.push(ClassRecord::new(name));
        self.classes.len() - 1
    }

    pub fn push_record(&mut self, record: ClassRecord) {
        self.classes.push(record);
    }

    pub fn add_method(&mut self, class_idx: usize, method: String) {
        if let Some(record) = self.classes.get_mut(class_idx) {
            record.methods.push(method);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
