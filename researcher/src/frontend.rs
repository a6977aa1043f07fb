/// Chat-style page served at `/`. It calls `/research`, `/progress/:topic`
/// and `/proposal/:topic` and renders the three answers as one reply.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Anvik.ai - Research Assistant</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
        }
        #chat {
            display: flex;
            flex-direction: column;
            gap: 12px;
            min-height: 400px;
            max-height: 600px;
            overflow-y: auto;
            padding: 12px;
            border: 1px solid #ddd;
            border-radius: 4px;
        }
        .message {
            white-space: pre-wrap;
            padding: 10px 14px;
            border-radius: 8px;
            max-width: 85%;
        }
        .message.user {
            align-self: flex-end;
            background-color: #cce5ff;
        }
        .message.assistant {
            align-self: flex-start;
            background-color: #f1f3f5;
        }
        .message.error {
            background-color: #f8d7da;
        }
        form {
            display: flex;
            gap: 10px;
            margin-top: 12px;
        }
        input {
            flex: 1;
            padding: 10px;
        }
        button {
            padding: 10px 20px;
            background-color: #007bff;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        button:disabled {
            background-color: #6c757d;
        }
    </style>
</head>
<body>
    <h1>Hi! I'm Anvik.ai - Your Personal Deep Research Assistant</h1>
    <p>Enter a research topic to get a detailed report with Wikipedia summaries, research papers, and citations.</p>
    <div id="chat"></div>
    <form id="ask">
        <input id="topic" placeholder="Enter a research topic (e.g., Artificial Intelligence in Healthcare)" autocomplete="off">
        <button id="submit" type="submit">Research</button>
    </form>

    <script>
    const chat = document.getElementById('chat');

    function addMessage(role, text) {
        const el = document.createElement('div');
        el.className = `message ${role}`;
        el.textContent = text;
        chat.appendChild(el);
        chat.scrollTop = chat.scrollHeight;
        return el;
    }

    async function getJson(url, options) {
        const response = await fetch(url, options);
        if (!response.ok) {
            throw new Error(`${url} failed with status ${response.status}`);
        }
        return response.json();
    }

    function formatReply(report, progress, proposal) {
        let text = `Research on ${report.topic}\n\n`;
        text += `Wikipedia Summary\n${report.wikipedia_summary}\n\n`;
        text += 'Research Papers\n';
        for (const paper of report.paper_summaries) {
            text += `Title: ${paper.title}\n`;
            text += `Authors: ${paper.authors.join(', ')}\n`;
            text += `Year: ${paper.year}\n`;
            text += `Abstract: ${paper.abstract}\n`;
            text += `Summary: ${paper.summary}\n`;
            text += `DOI: ${paper.doi}\n`;
            text += `URL: ${paper.url}\n\n`;
        }
        text += 'APA Citations\n' + report.citations_apa.map(c => `- ${c}`).join('\n') + '\n\n';
        text += 'MLA Citations\n' + report.citations_mla.map(c => `- ${c}`).join('\n') + '\n\n';
        text += `Progress\n${progress}\n\n`;
        text += `Research Proposal\n${proposal}`;
        return text;
    }

    document.getElementById('ask').addEventListener('submit', async (event) => {
        event.preventDefault();
        const input = document.getElementById('topic');
        const button = document.getElementById('submit');
        const topic = input.value.trim();
        if (!topic) {
            return;
        }

        addMessage('user', topic);
        input.value = '';
        button.disabled = true;
        const pending = addMessage('assistant', 'Researching...');

        try {
            const report = await getJson('/research', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ topic }),
            });
            const encoded = encodeURIComponent(topic);
            const progress = await getJson(`/progress/${encoded}`);
            const proposal = await getJson(`/proposal/${encoded}`);
            pending.textContent = formatReply(report, progress.message, proposal.proposal);
        } catch (error) {
            pending.className = 'message assistant error';
            pending.textContent = `Error: ${error.message}`;
        } finally {
            button.disabled = false;
        }
    });
    </script>
</body>
</html>
"#;
