use pdfdeck_core::Topic;

/// Which input of the topic form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
}

/// Whether a topic form creates a new topic or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit { id: String },
}

/// Two-field text form for adding or editing a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicForm {
    pub kind: FormKind,
    pub title: String,
    pub description: String,
    pub focus: Field,
}

impl TopicForm {
    pub fn add() -> Self {
        Self {
            kind: FormKind::Add,
            title: String::new(),
            description: String::new(),
            focus: Field::Title,
        }
    }

    /// Pre-fill the form with the topic's current values.
    pub fn edit(topic: &Topic) -> Self {
        Self {
            kind: FormKind::Edit {
                id: topic.id.clone(),
            },
            title: topic.title.clone(),
            description: topic.description.clone(),
            focus: Field::Title,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.kind {
            FormKind::Add => " Add Topic ",
            FormKind::Edit { .. } => " Edit Topic ",
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Title => Field::Description,
            Field::Description => Field::Title,
        };
    }
}

/// Modal text entry currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Path of the PDF to open.
    OpenFile(String),
    Topic(TopicForm),
}

impl Prompt {
    pub fn push(&mut self, c: char) {
        match self {
            Prompt::OpenFile(path) => path.push(c),
            Prompt::Topic(form) => form.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self {
            Prompt::OpenFile(path) => {
                path.pop();
            }
            Prompt::Topic(form) => form.backspace(),
        }
    }

    pub fn next_field(&mut self) {
        if let Prompt::Topic(form) = self {
            form.toggle_focus();
        }
    }
}
