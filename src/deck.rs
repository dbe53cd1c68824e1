use crate::style::{Gradient, ParseGradientError};

/// A single slide in the deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Slide {
    pub(crate) title: &'static str,
    pub(crate) subtitle: &'static str,
    pub(crate) body: &'static str,
    pub(crate) background: &'static str,
    pub(crate) icon: &'static str,
}

impl Slide {
    /// Parse this slide's background gradient.
    pub(crate) fn gradient(&self) -> Result<Gradient, ParseGradientError> {
        self.background.parse()
    }
}

/// The slides that make up the deck, in presentation order.
pub(crate) static SLIDES: [Slide; 5] = [
    Slide {
        title: "How Learning English Literature Improves Our Life",
        subtitle: "Discovering the Transformative Power of Words",
        body: "English literature isn't just about reading old books or analyzing poems. It's a journey into the \
               human experience that shapes who we are and how we see the world around us.",
        background: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
        icon: "📚",
    },
    Slide {
        title: "Expanding Our Emotional Intelligence",
        subtitle: "Understanding Hearts and Minds",
        body: "Through the characters we meet in literature—from Shakespeare's complex protagonists to modern \
               heroes—we learn to understand emotions we might never experience ourselves. We walk in someone \
               else's shoes, feel their joys and sorrows, and develop deeper empathy. This emotional awareness \
               doesn't stay on the page; it follows us into our relationships, making us better friends, \
               partners, and colleagues.",
        background: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
        icon: "❤️",
    },
    Slide {
        title: "Sharpening Critical Thinking Skills",
        subtitle: "Learning to Question and Analyze",
        body: "Literature teaches us to read between the lines, to question motives, and to see multiple \
               perspectives. When we analyze symbolism in 'The Great Gatsby' or debate the themes in '1984', \
               we're training our minds to think critically about everything—from news articles to social media \
               posts. In today's world of information overload, this skill is more valuable than ever.",
        background: "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)",
        icon: "🧠",
    },
    Slide {
        title: "Improving Communication and Expression",
        subtitle: "Finding Our Voice",
        body: "Reading great writers shows us the power of well-chosen words. We learn how to express complex \
               ideas clearly, how to persuade, how to tell our own stories. Whether we're writing an email, \
               giving a presentation, or just having a conversation, the vocabulary and communication skills we \
               gain from literature help us connect with others more effectively and express ourselves with \
               confidence.",
        background: "linear-gradient(135deg, #43e97b 0%, #38f9d7 100%)",
        icon: "💬",
    },
    Slide {
        title: "Building Cultural Awareness and Connection",
        subtitle: "Bridging Worlds Through Stories",
        body: "English literature opens windows to different cultures, time periods, and ways of life. From Jane \
               Austen's England to Chinua Achebe's Nigeria, from ancient mythology to contemporary voices, we gain \
               a richer understanding of our diverse world. This cultural literacy helps us navigate our \
               globalized society with respect and curiosity, connecting us to the broader human family across \
               time and space.",
        background: "linear-gradient(135deg, #fa709a 0%, #fee140 100%)",
        icon: "🌍",
    },
];
